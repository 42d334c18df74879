//! Packaging rule sets and their formula token sequences.
//!
//! Wire format follows the backend JSON column: a rule set is an array of
//! rules, each formula an array of `{"tipo": ..., "valor": ...}` tokens.
//! The "volume completo" shorthand is presentation sugar over
//! `MAIOR_IGUAL_A` plus a single numeric-literal item formula; it is
//! reconstructed from stored rules and never serialized as its own value.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const CONTEXT_VARIABLES: [&str; 8] = [
    "QTD_A_PROCESSAR",
    "QTD_TOTAL_PEDIDO",
    "QTD_NESTE_VOLUME",
    "PESO_ITEM_UNICO",
    "ALTURA_ITEM_UNICO",
    "LARGURA_ITEM_UNICO",
    "COMPRIMENTO_ITEM_UNICO",
    "ACRESCIMO_EMBALAGEM",
];

pub const OPERATORS: [&str; 6] = ["+", "-", "*", "/", "(", ")"];

/// UI select value for the shorthand mode. Not a wire trigger value.
pub const VOLUME_COMPLETO: &str = "VOLUME_COMPLETO";

/// Options for the trigger select, in display order: `(value, label)`.
pub const TRIGGER_OPTIONS: [(&str, &str); 6] = [
    (VOLUME_COMPLETO, "Criar Volume Completo (ex: caixa com 100 un)"),
    ("SEMPRE", "Sempre Executar (Regra Padrão/Final)"),
    ("MAIOR_IGUAL_A", "Qtd. a Embalar >= (Maior ou Igual a)"),
    ("IGUAL_A", "Qtd. a Embalar = (Igual a)"),
    ("MENOR_QUE", "Qtd. a Embalar < (Menor que)"),
    ("ENTRE", "Qtd. a Embalar ENTRE (ex: 5,10)"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tipo", content = "valor", rename_all = "lowercase")]
pub enum FormulaToken {
    Variavel(String),
    Operador(String),
    Numero(String),
}

impl FormulaToken {
    pub fn variable(name: &str) -> Self {
        Self::Variavel(name.to_string())
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Variavel(s) | Self::Operador(s) | Self::Numero(s) => s,
        }
    }
}

pub type Formula = Vec<FormulaToken>;

/// Space-joined preview of a formula, e.g. `PESO_ITEM_UNICO * QTD_NESTE_VOLUME`.
pub fn format_formula(formula: &[FormulaToken]) -> String {
    formula
        .iter()
        .map(FormulaToken::text)
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerCondition {
    #[default]
    Sempre,
    MaiorIgualA,
    IgualA,
    MenorQue,
    Entre,
}

impl TriggerCondition {
    pub fn parse(s: &str) -> Self {
        match s {
            "MAIOR_IGUAL_A" => Self::MaiorIgualA,
            "IGUAL_A" => Self::IgualA,
            "MENOR_QUE" => Self::MenorQue,
            "ENTRE" => Self::Entre,
            _ => Self::Sempre,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sempre => "SEMPRE",
            Self::MaiorIgualA => "MAIOR_IGUAL_A",
            Self::IgualA => "IGUAL_A",
            Self::MenorQue => "MENOR_QUE",
            Self::Entre => "ENTRE",
        }
    }
}

impl Serialize for TriggerCondition {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TriggerCondition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

// The priority input arrives as a number from the backend but as a string
// when echoed back from a form edit.
fn de_priority<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(n.as_i64().unwrap_or(10)),
        Value::String(s) => Ok(s.trim().parse().unwrap_or(10)),
        _ => Ok(10),
    }
}

/// One stored packaging rule. Higher `prioridade` runs first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(deserialize_with = "de_priority")]
    pub prioridade: i64,
    pub condicao_gatilho: TriggerCondition,
    #[serde(default)]
    pub valor_gatilho: Option<String>,
    #[serde(default)]
    pub formula_itens: Formula,
    #[serde(default)]
    pub formula_altura: Formula,
    #[serde(default)]
    pub formula_largura: Formula,
    #[serde(default)]
    pub formula_comprimento: Formula,
    #[serde(default)]
    pub formula_peso: Formula,
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            prioridade: 10,
            condicao_gatilho: TriggerCondition::Sempre,
            valor_gatilho: None,
            formula_itens: vec![FormulaToken::variable("QTD_A_PROCESSAR")],
            formula_altura: vec![FormulaToken::variable("ALTURA_ITEM_UNICO")],
            formula_largura: vec![FormulaToken::variable("LARGURA_ITEM_UNICO")],
            formula_comprimento: vec![FormulaToken::variable("COMPRIMENTO_ITEM_UNICO")],
            formula_peso: vec![
                FormulaToken::variable("PESO_ITEM_UNICO"),
                FormulaToken::Operador("*".into()),
                FormulaToken::variable("QTD_NESTE_VOLUME"),
            ],
        }
    }
}

/// A rule plus UI-only state: a stable key for rendering and the
/// volume-completo mode flag. Neither is serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableRule {
    pub uid: Uuid,
    pub rule: Rule,
    pub volume_completo: bool,
}

impl EditableRule {
    pub fn fresh() -> Self {
        Self {
            uid: Uuid::new_v4(),
            rule: Rule::default(),
            volume_completo: false,
        }
    }

    /// Wraps a stored rule, detecting the shorthand: trigger `MAIOR_IGUAL_A`
    /// with an item formula of exactly one numeric literal equal to the
    /// trigger value.
    pub fn from_rule(rule: Rule) -> Self {
        let volume_completo = rule.condicao_gatilho == TriggerCondition::MaiorIgualA
            && rule.formula_itens.len() == 1
            && matches!(
                &rule.formula_itens[0],
                FormulaToken::Numero(v) if Some(v.as_str()) == rule.valor_gatilho.as_deref()
            );
        Self {
            uid: Uuid::new_v4(),
            rule,
            volume_completo,
        }
    }

    /// Value shown in the trigger select.
    pub fn trigger_selection(&self) -> &'static str {
        if self.volume_completo {
            VOLUME_COMPLETO
        } else {
            self.rule.condicao_gatilho.as_str()
        }
    }

    /// Applies a trigger-select change, including the shorthand transitions.
    pub fn set_trigger(&mut self, selected: &str) {
        if selected == VOLUME_COMPLETO {
            self.volume_completo = true;
            self.rule.condicao_gatilho = TriggerCondition::MaiorIgualA;
            if let Some(v) = self.container_size() {
                self.rule.formula_itens = vec![FormulaToken::Numero(v)];
            }
            return;
        }
        let leaving_shorthand = self.volume_completo;
        self.volume_completo = false;
        self.rule.condicao_gatilho = TriggerCondition::parse(selected);
        if self.rule.condicao_gatilho == TriggerCondition::Sempre {
            self.rule.valor_gatilho = None;
            self.rule.formula_itens = vec![FormulaToken::variable("QTD_A_PROCESSAR")];
        } else if leaving_shorthand {
            self.rule.formula_itens = vec![FormulaToken::variable("QTD_A_PROCESSAR")];
        }
    }

    /// Applies a trigger-value edit. In shorthand mode the item formula is
    /// live-rewritten to the single numeric literal.
    pub fn set_trigger_value(&mut self, value: &str) {
        self.rule.valor_gatilho = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
        if self.volume_completo {
            self.rule.formula_itens = match self.container_size() {
                Some(v) => vec![FormulaToken::Numero(v)],
                None => Vec::new(),
            };
        }
    }

    fn container_size(&self) -> Option<String> {
        let v = self.rule.valor_gatilho.as_deref()?.trim();
        v.parse::<i64>().ok().map(|_| v.to_string())
    }

    /// Wire form: UI state stripped, `SEMPRE`/empty trigger value normalized
    /// to null.
    pub fn to_wire(&self) -> Rule {
        let mut rule = self.rule.clone();
        let empty = rule.valor_gatilho.as_deref().map_or(true, |v| v.is_empty());
        if rule.condicao_gatilho == TriggerCondition::Sempre || empty {
            rule.valor_gatilho = None;
        }
        rule
    }
}

/// Ordered set of editable rules. Always holds at least one rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSet {
    pub rules: Vec<EditableRule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            rules: vec![EditableRule::fresh()],
        }
    }
}

impl RuleSet {
    /// Parses the draft value. Anything that is not a non-empty rule array
    /// yields a single default rule.
    pub fn from_draft(value: &Value) -> Self {
        let rules: Vec<EditableRule> = value
            .as_array()
            .map(|arr| {
                arr.iter()
                    .filter_map(|v| serde_json::from_value::<Rule>(v.clone()).ok())
                    .map(EditableRule::from_rule)
                    .collect()
            })
            .unwrap_or_default();
        if rules.is_empty() {
            Self::default()
        } else {
            Self { rules }
        }
    }

    pub fn to_draft(&self) -> Value {
        let wire: Vec<Rule> = self.rules.iter().map(EditableRule::to_wire).collect();
        serde_json::to_value(wire).unwrap_or(Value::Null)
    }

    pub fn add_rule(&mut self) {
        self.rules.push(EditableRule::fresh());
    }

    pub fn remove_rule(&mut self, index: usize) -> Result<(), String> {
        if self.rules.len() <= 1 {
            return Err("É necessário ter pelo menos uma regra.".to_string());
        }
        if index < self.rules.len() {
            self.rules.remove(index);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn token_wire_format() {
        let t = FormulaToken::Numero("100".into());
        assert_eq!(
            serde_json::to_value(&t).unwrap(),
            json!({"tipo": "numero", "valor": "100"})
        );
        let back: FormulaToken =
            serde_json::from_value(json!({"tipo": "variavel", "valor": "QTD_A_PROCESSAR"})).unwrap();
        assert_eq!(back, FormulaToken::variable("QTD_A_PROCESSAR"));
    }

    #[test]
    fn default_rule_shape() {
        let r = Rule::default();
        assert_eq!(r.prioridade, 10);
        assert_eq!(r.condicao_gatilho, TriggerCondition::Sempre);
        assert_eq!(r.formula_itens, vec![FormulaToken::variable("QTD_A_PROCESSAR")]);
        assert_eq!(format_formula(&r.formula_peso), "PESO_ITEM_UNICO * QTD_NESTE_VOLUME");
    }

    #[test]
    fn volume_completo_rewrites_item_formula() {
        let mut rule = EditableRule::fresh();
        rule.set_trigger(VOLUME_COMPLETO);
        rule.set_trigger_value("100");

        assert!(rule.volume_completo);
        assert_eq!(rule.rule.condicao_gatilho, TriggerCondition::MaiorIgualA);
        assert_eq!(rule.rule.formula_itens, vec![FormulaToken::Numero("100".into())]);

        rule.set_trigger_value("250");
        assert_eq!(rule.rule.formula_itens, vec![FormulaToken::Numero("250".into())]);
    }

    #[test]
    fn switching_back_to_sempre_resets() {
        let mut rule = EditableRule::fresh();
        rule.set_trigger(VOLUME_COMPLETO);
        rule.set_trigger_value("100");
        rule.set_trigger("SEMPRE");

        assert!(!rule.volume_completo);
        assert_eq!(rule.rule.valor_gatilho, None);
        assert_eq!(rule.rule.formula_itens, vec![FormulaToken::variable("QTD_A_PROCESSAR")]);
    }

    #[test]
    fn leaving_shorthand_for_condition_restores_default_formula() {
        let mut rule = EditableRule::fresh();
        rule.set_trigger(VOLUME_COMPLETO);
        rule.set_trigger_value("100");
        rule.set_trigger("MENOR_QUE");

        assert!(!rule.volume_completo);
        assert_eq!(rule.rule.condicao_gatilho, TriggerCondition::MenorQue);
        // the numeric literal is not a meaningful item formula outside the shorthand
        assert_eq!(rule.rule.formula_itens, vec![FormulaToken::variable("QTD_A_PROCESSAR")]);
        // trigger value kept for the explicit condition
        assert_eq!(rule.rule.valor_gatilho.as_deref(), Some("100"));
    }

    #[test]
    fn stored_shorthand_is_reconstructed() {
        let rule = Rule {
            condicao_gatilho: TriggerCondition::MaiorIgualA,
            valor_gatilho: Some("100".into()),
            formula_itens: vec![FormulaToken::Numero("100".into())],
            ..Default::default()
        };
        assert!(EditableRule::from_rule(rule).volume_completo);

        let plain = Rule {
            condicao_gatilho: TriggerCondition::MaiorIgualA,
            valor_gatilho: Some("100".into()),
            formula_itens: vec![FormulaToken::variable("QTD_A_PROCESSAR")],
            ..Default::default()
        };
        assert!(!EditableRule::from_rule(plain).volume_completo);
    }

    #[test]
    fn wire_form_normalizes_trigger_value() {
        let mut rule = EditableRule::fresh();
        rule.rule.valor_gatilho = Some("5".into());
        // trigger stays SEMPRE
        assert_eq!(rule.to_wire().valor_gatilho, None);

        rule.set_trigger("ENTRE");
        rule.set_trigger_value("5,10");
        assert_eq!(rule.to_wire().valor_gatilho.as_deref(), Some("5,10"));
    }

    #[test]
    fn draft_round_trip() {
        let stored = json!([
            {
                "prioridade": "20",
                "condicao_gatilho": "MAIOR_IGUAL_A",
                "valor_gatilho": "100",
                "formula_itens": [{"tipo": "numero", "valor": "100"}],
                "formula_altura": [{"tipo": "variavel", "valor": "ALTURA_ITEM_UNICO"}],
                "formula_largura": [],
                "formula_comprimento": [],
                "formula_peso": []
            }
        ]);
        let set = RuleSet::from_draft(&stored);
        assert_eq!(set.rules.len(), 1);
        assert!(set.rules[0].volume_completo);
        assert_eq!(set.rules[0].rule.prioridade, 20);

        let out = set.to_draft();
        assert_eq!(out[0]["condicao_gatilho"], json!("MAIOR_IGUAL_A"));
        assert_eq!(out[0]["prioridade"], json!(20));
        assert!(out[0].get("uid").is_none());
    }

    #[test]
    fn empty_draft_yields_one_default_rule() {
        assert_eq!(RuleSet::from_draft(&Value::Null).rules.len(), 1);
        assert_eq!(RuleSet::from_draft(&json!([])).rules.len(), 1);
    }

    #[test]
    fn last_rule_cannot_be_removed() {
        let mut set = RuleSet::default();
        assert!(set.remove_rule(0).is_err());
        set.add_rule();
        assert!(set.remove_rule(0).is_ok());
        assert_eq!(set.rules.len(), 1);
    }
}
