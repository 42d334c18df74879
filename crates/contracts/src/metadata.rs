use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Tab assigned to fields whose metadata declares none.
pub const DEFAULT_TAB: &str = "Dados Gerais";

// ============================================================================
// Field types
// ============================================================================

/// Backend-declared input type of a field.
///
/// The backend sends free-form strings; anything we do not recognize maps to
/// `Unknown` so a metadata change on the server can never break the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Email,
    Number,
    Date,
    Datetime,
    Boolean,
    Select,
    CreatableSelect,
    RuleBuilder,
    OrderItems,
    Unknown,
}

impl FieldType {
    pub fn parse(s: &str) -> Self {
        match s {
            "text" => Self::Text,
            "email" => Self::Email,
            "number" => Self::Number,
            "date" => Self::Date,
            "datetime" => Self::Datetime,
            "boolean" => Self::Boolean,
            "select" => Self::Select,
            "creatable_select" => Self::CreatableSelect,
            "rule_builder" => Self::RuleBuilder,
            "order_items" => Self::OrderItems,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Number => "number",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Boolean => "boolean",
            Self::Select => "select",
            Self::CreatableSelect => "creatable_select",
            Self::RuleBuilder => "rule_builder",
            Self::OrderItems => "order_items",
            Self::Unknown => "unknown",
        }
    }

    pub fn is_date_like(&self) -> bool {
        matches!(self, Self::Date | Self::Datetime)
    }
}

impl Default for FieldType {
    fn default() -> Self {
        Self::Text
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(FieldType::parse(&s))
    }
}

// ============================================================================
// Format masks
// ============================================================================

/// Named formatting profile attached to a field by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatMask {
    /// Postal code, `00000-000`.
    Cep,
    /// Fiscal classification code, `0000.00.00`.
    Ncm,
    /// CPF (11 digits) or CNPJ (14 digits), switched on length.
    CnpjCpf,
    /// Landline (10 digits) or mobile (11 digits), switched on length.
    Phone,
    /// Money, 2 fraction digits, `R$ ` prefix.
    Currency,
    /// Percentage, 2 fraction digits, bounded 0–999.99.
    Percent2,
    Decimal2,
    Decimal3,
    /// Profile we do not know; the field falls back to a plain text input.
    Other(String),
}

impl FormatMask {
    pub fn parse(s: &str) -> Self {
        match s {
            "cep" => Self::Cep,
            "ncm" => Self::Ncm,
            // The backend historically emitted both spellings.
            "cnpj" | "cnpj_cpf" => Self::CnpjCpf,
            "phone" => Self::Phone,
            "currency" => Self::Currency,
            "percent:2" => Self::Percent2,
            "decimal:2" => Self::Decimal2,
            "decimal:3" => Self::Decimal3,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Cep => "cep",
            Self::Ncm => "ncm",
            Self::CnpjCpf => "cnpj_cpf",
            Self::Phone => "phone",
            Self::Currency => "currency",
            Self::Percent2 => "percent:2",
            Self::Decimal2 => "decimal:2",
            Self::Decimal3 => "decimal:3",
            Self::Other(s) => s,
        }
    }

    /// Numeric profiles store a number; pattern profiles store a digit string.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Currency | Self::Percent2 | Self::Decimal2 | Self::Decimal3
        )
    }
}

impl Serialize for FormatMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FormatMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(FormatMask::parse(&s))
    }
}

// ============================================================================
// Field descriptor / model metadata
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SelectOption {
    pub value: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl SelectOption {
    pub fn display(&self) -> String {
        format_label(self.label.as_deref().unwrap_or(&self.value))
    }
}

/// Schema entry describing one editable/displayable attribute of a model.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub tab: Option<String>,
    #[serde(default)]
    pub format_mask: Option<FormatMask>,
    #[serde(default)]
    pub foreign_key_model: Option<String>,
    #[serde(default)]
    pub foreign_key_label_field: Option<String>,
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

impl FieldDescriptor {
    /// The FK pair is only meaningful when both halves are present.
    pub fn reference(&self) -> Option<(&str, &str)> {
        match (
            self.foreign_key_model.as_deref(),
            self.foreign_key_label_field.as_deref(),
        ) {
            (Some(m), Some(l)) => Some((m, l)),
            _ => None,
        }
    }

    /// Password fields are sniffed from the name, in both vocabularies the
    /// backend uses plus the hashed-column convention.
    pub fn is_password(&self) -> bool {
        let name = self.name.to_lowercase();
        name.contains("password") || name.contains("senha") || name.contains("hashed")
    }

    pub fn tab_name(&self) -> &str {
        match self.tab.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => DEFAULT_TAB,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ModelMetadata {
    pub display_name: String,
    #[serde(default)]
    pub display_name_plural: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl ModelMetadata {
    pub fn plural(&self) -> &str {
        self.display_name_plural
            .as_deref()
            .unwrap_or(&self.display_name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

// ============================================================================
// Input resolution
// ============================================================================

/// The concrete input behavior a descriptor resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum InputKind {
    /// Masked text input delegating to the masking engine.
    Masked(FormatMask),
    /// Async FK lookup select.
    Reference { model: String, label_field: String },
    /// Obscured input with a show/hide toggle.
    Password,
    /// Plain text; `numeric` constrains the keyboard when no mask applies.
    Text { numeric: bool },
    Date { with_time: bool },
    /// Tri-state true/false/unset select.
    Boolean,
    Select,
    CreatableSelect,
    RuleBuilder,
    OrderItems,
}

/// Resolve a descriptor to its input behavior. First match wins; unknown
/// types degrade to plain text with a logged warning, never an error.
pub fn resolve_input(field: &FieldDescriptor) -> InputKind {
    if let Some(mask) = &field.format_mask {
        if !field.field_type.is_date_like() && !matches!(mask, FormatMask::Other(_)) {
            return InputKind::Masked(mask.clone());
        }
    }

    if let Some((model, label_field)) = field.reference() {
        return InputKind::Reference {
            model: model.to_string(),
            label_field: label_field.to_string(),
        };
    }

    if field.is_password() {
        return InputKind::Password;
    }

    match field.field_type {
        FieldType::Text | FieldType::Email => InputKind::Text { numeric: false },
        FieldType::Number => InputKind::Text { numeric: true },
        FieldType::Date => InputKind::Date { with_time: false },
        FieldType::Datetime => InputKind::Date { with_time: true },
        FieldType::Boolean => InputKind::Boolean,
        FieldType::Select => InputKind::Select,
        FieldType::CreatableSelect => InputKind::CreatableSelect,
        FieldType::RuleBuilder => InputKind::RuleBuilder,
        FieldType::OrderItems => InputKind::OrderItems,
        FieldType::Unknown => {
            log::warn!("unknown field type for '{}', rendering as text", field.name);
            InputKind::Text { numeric: false }
        }
    }
}

// ============================================================================
// Tabs and drafts
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TabGroup {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
}

/// Group fields into tabs preserving first-seen order, both for the tabs
/// themselves and for the fields inside each tab.
pub fn group_tabs(fields: &[FieldDescriptor]) -> Vec<TabGroup> {
    let mut tabs: Vec<TabGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for field in fields {
        let name = field.tab_name().to_string();
        let idx = *index.entry(name.clone()).or_insert_with(|| {
            tabs.push(TabGroup {
                name,
                fields: Vec::new(),
            });
            tabs.len() - 1
        });
        tabs[idx].fields.push(field.clone());
    }

    tabs
}

/// Blank draft for create mode: booleans start as `false`, everything else
/// as `null`.
pub fn empty_draft(fields: &[FieldDescriptor]) -> serde_json::Map<String, Value> {
    let mut draft = serde_json::Map::new();
    for field in fields {
        let default = match field.field_type {
            FieldType::Boolean => Value::Bool(false),
            _ => Value::Null,
        };
        draft.insert(field.name.clone(), default);
    }
    draft
}

/// Dropdown display text: underscores become spaces, each word capitalized.
pub fn format_label(text: &str) -> String {
    text.to_lowercase()
        .replace('_', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, field_type: FieldType) -> FieldDescriptor {
        FieldDescriptor {
            name: name.to_string(),
            label: format_label(name),
            field_type,
            ..Default::default()
        }
    }

    #[test]
    fn mask_takes_precedence_over_type() {
        let mut f = field("preco", FieldType::Number);
        f.format_mask = Some(FormatMask::Currency);
        assert_eq!(resolve_input(&f), InputKind::Masked(FormatMask::Currency));
    }

    #[test]
    fn mask_ignored_on_date_fields() {
        let mut f = field("data_emissao", FieldType::Date);
        f.format_mask = Some(FormatMask::Other("date".to_string()));
        assert_eq!(resolve_input(&f), InputKind::Date { with_time: false });
    }

    #[test]
    fn unknown_mask_falls_through_to_type_dispatch() {
        let mut f = field("observacao", FieldType::Text);
        f.format_mask = Some(FormatMask::Other("wat".to_string()));
        assert_eq!(resolve_input(&f), InputKind::Text { numeric: false });
    }

    #[test]
    fn reference_requires_both_halves() {
        let mut f = field("id_vendedor", FieldType::Number);
        f.foreign_key_model = Some("cadastros".to_string());
        // Only one half set: not a reference.
        assert_eq!(resolve_input(&f), InputKind::Text { numeric: true });

        f.foreign_key_label_field = Some("nome_razao".to_string());
        assert_eq!(
            resolve_input(&f),
            InputKind::Reference {
                model: "cadastros".to_string(),
                label_field: "nome_razao".to_string(),
            }
        );
    }

    #[test]
    fn password_sniffed_in_both_languages() {
        assert_eq!(resolve_input(&field("senha_acesso", FieldType::Text)), InputKind::Password);
        assert_eq!(resolve_input(&field("user_password", FieldType::Text)), InputKind::Password);
        assert_eq!(
            resolve_input(&field("hashed_password", FieldType::Text)),
            InputKind::Password
        );
    }

    #[test]
    fn unknown_type_falls_back_to_text() {
        let f = field("mystery", FieldType::parse("hologram"));
        assert_eq!(resolve_input(&f), InputKind::Text { numeric: false });
    }

    #[test]
    fn boolean_defaults_to_false_in_draft() {
        let fields = vec![
            field("ativo", FieldType::Boolean),
            field("descricao", FieldType::Text),
            field("preco", FieldType::Number),
        ];
        let draft = empty_draft(&fields);
        assert_eq!(draft["ativo"], Value::Bool(false));
        assert_eq!(draft["descricao"], Value::Null);
        assert_eq!(draft["preco"], Value::Null);
    }

    #[test]
    fn tabs_preserve_first_seen_order() {
        let mut a = field("sku", FieldType::Text);
        a.tab = Some("Dados Gerais".to_string());
        let mut b = field("quantidade", FieldType::Number);
        b.tab = Some("Estoque".to_string());
        let mut c = field("descricao", FieldType::Text);
        c.tab = Some("Dados Gerais".to_string());
        let d = field("observacao", FieldType::Text); // no tab -> default

        let tabs = group_tabs(&[a, b, c, d]);
        assert_eq!(tabs.len(), 2);
        assert_eq!(tabs[0].name, "Dados Gerais");
        assert_eq!(tabs[1].name, "Estoque");
        let names: Vec<_> = tabs[0].fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["sku", "descricao", "observacao"]);
    }

    #[test]
    fn tab_groups_compare_by_fields() {
        let fields = vec![field("sku", FieldType::Text), field("ativo", FieldType::Boolean)];
        assert_eq!(group_tabs(&fields), group_tabs(&fields));

        let mut changed = fields.clone();
        changed[0].required = true;
        assert_ne!(group_tabs(&fields), group_tabs(&changed));
    }

    #[test]
    fn metadata_deserializes_unknown_type_and_mask() {
        let json = r#"{
            "display_name": "Produto",
            "display_name_plural": "Produtos",
            "fields": [
                {"name": "descricao", "label": "Descrição", "type": "text", "required": true},
                {"name": "widget", "label": "Widget", "type": "flux_capacitor", "format_mask": "warp"}
            ]
        }"#;
        let meta: ModelMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.plural(), "Produtos");
        assert_eq!(meta.fields[1].field_type, FieldType::Unknown);
        assert_eq!(
            meta.fields[1].format_mask,
            Some(FormatMask::Other("warp".to_string()))
        );
    }

    #[test]
    fn format_label_capitalizes_words() {
        assert_eq!(format_label("nome_razao"), "Nome Razao");
        assert_eq!(format_label("A_VISTA"), "A Vista");
    }
}
