//! Fixed category vocabulary offered for each entry kind.
//!
//! The vocabulary drives input forms only. Aggregation never rejects a name that
//! is missing from it; unknown names get their own bucket.

use super::entry::EntryKind;

const EXPENSE_CATEGORIES: &[&str] = &[
    "Carne",
    "Agua",
    "Gas",
    "Salarios",
    "Insumos",
    "Transporte",
    "Servicios",
    "Refresco",
    "Otros",
    "Cambio",
];

const INCOME_CATEGORIES: &[&str] = &[
    "Efectivo",
    "Transferencia",
    "Ventas",
    "Servicios",
    "Otros",
    "Cambio",
];

const INVESTMENT_CATEGORIES: &[&str] = &[
    "Acciones",
    "Bonos",
    "Criptomonedas",
    "Bienes Raíces",
    "Negocio",
    "Otros",
];

/// Returns the categories offered for `kind`, in display order.
pub fn vocabulary(kind: EntryKind) -> &'static [&'static str] {
    match kind {
        EntryKind::Expense => EXPENSE_CATEGORIES,
        EntryKind::Income => INCOME_CATEGORIES,
        EntryKind::Investment => INVESTMENT_CATEGORIES,
    }
}

pub fn is_known(kind: EntryKind, name: &str) -> bool {
    vocabulary(kind).contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_names_belong_to_several_kinds() {
        assert!(is_known(EntryKind::Expense, "Servicios"));
        assert!(is_known(EntryKind::Income, "Servicios"));
        assert!(!is_known(EntryKind::Investment, "Servicios"));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(is_known(EntryKind::Investment, "Bienes Raíces"));
        assert!(!is_known(EntryKind::Investment, "bienes raíces"));
    }
}
