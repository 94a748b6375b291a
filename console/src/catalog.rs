// Reports each role may request

use common::models::{Role, User};

/// Report available to collaborators; its entity is always their own organization
pub const COLLABORATOR_REPORT: &str = "Reporte de Entidad";

const ADMINISTRATOR_REPORTS: &[&str] = &[
    "Reporte general canales y usuarios",
    "Cobro Tarifa SEBRA",
    "Delegados PKI Activos",
    "Usuarios Internos",
    "Usuarios Proveedores",
    "Usuarios por Rol",
];

const COLLABORATOR_REPORTS: &[&str] = &[COLLABORATOR_REPORT];

/// Fixed report definitions per role
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportCatalog;

impl ReportCatalog {
    /// Report names the role can pick from; empty for users without a role
    pub fn reports_for(&self, role: Option<Role>) -> &'static [&'static str] {
        match role {
            Some(Role::Administrator) => ADMINISTRATOR_REPORTS,
            Some(Role::Collaborator) => COLLABORATOR_REPORTS,
            None => &[],
        }
    }

    pub fn allows(&self, role: Option<Role>, report: &str) -> bool {
        self.reports_for(role).contains(&report)
    }

    /// Introductory text shown above the filters
    pub fn description(&self, user: &User) -> String {
        if user.is_collaborator() {
            format!(
                "Utilice el siguiente formulario para generar un reporte historico de todos los usuarios asociados a su entidad: {}.",
                user.organization
            )
        } else {
            "Utilice el siguiente formulario para generar un reporte historico del tipo seleccionado en el primer filtro.".to_string()
        }
    }
}
