//! Status-transition actions shown on filtered order lists.
//!
//! An action only appears while its source status is the active filter, so
//! the operator always sees which stage the selected record leaves.

/// What pressing the action button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Plain `PUT {situacao: target}` after a confirm dialog.
    Transition { target: &'static str },
    /// Opens the stock-allocation dialog; the transition happens on save.
    Programacao,
}

#[derive(Debug, Clone, Copy)]
pub struct StatusAction {
    pub model: &'static str,
    pub from: &'static str,
    pub label: &'static str,
    pub confirm: &'static str,
    pub kind: ActionKind,
}

const ACTIONS: [StatusAction; 3] = [
    StatusAction {
        model: "pedidos",
        from: "Orçamento",
        label: "Converter para Pedido",
        confirm: "Deseja converter este orçamento em pedido?",
        kind: ActionKind::Transition { target: "Aprovação" },
    },
    StatusAction {
        model: "pedidos",
        from: "Aprovação",
        label: "Aprovar Pedido",
        confirm: "Deseja aprovar este pedido para programação?",
        kind: ActionKind::Transition { target: "Programação" },
    },
    StatusAction {
        model: "pedidos",
        from: "Programação",
        label: "Programar Pedido",
        confirm: "",
        kind: ActionKind::Programacao,
    },
];

pub fn actions_for(model: &str, status: Option<&str>) -> Vec<StatusAction> {
    let Some(status) = status else {
        return Vec::new();
    };
    ACTIONS
        .iter()
        .copied()
        .filter(|a| a.model == model && a.from == status)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_require_matching_filter() {
        assert!(actions_for("pedidos", None).is_empty());
        assert!(actions_for("produtos", Some("Orçamento")).is_empty());

        let found = actions_for("pedidos", Some("Orçamento"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].label, "Converter para Pedido");
        assert_eq!(found[0].kind, ActionKind::Transition { target: "Aprovação" });
    }

    #[test]
    fn programming_stage_opens_the_dialog() {
        let found = actions_for("pedidos", Some("Programação"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, ActionKind::Programacao);
    }
}
