//! Calls against the metadata-driven generic endpoints.

use contracts::metadata::ModelMetadata;
use contracts::orders::StockLot;
use contracts::query::ListQuery;
use serde::Deserialize;
use serde_json::Value;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

use super::client;
use crate::system::session::context::Session;

#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub items: Vec<Value>,
    #[serde(default)]
    pub total_count: u32,
}

/// Save failures split only where the form cares: validation vs the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    Validation,
    Other(String),
}

pub async fn fetch_metadata(session: &Session, model: &str) -> Result<ModelMetadata, String> {
    client::get_json(session, &format!("/metadata/{}", model)).await
}

pub async fn fetch_list(
    session: &Session,
    model: &str,
    query: &ListQuery,
) -> Result<ListResponse, String> {
    client::get_json(session, &format!("/generic/{}?{}", model, query.query_string())).await
}

pub async fn fetch_record(session: &Session, model: &str, id: i64) -> Result<Value, String> {
    client::get_json(session, &format!("/generic/{}/{}", model, id)).await
}

pub async fn create_record(session: &Session, model: &str, body: &Value) -> Result<Value, SaveError> {
    save(session, "POST", &format!("/generic/{}", model), body).await
}

pub async fn update_record(
    session: &Session,
    model: &str,
    id: i64,
    body: &Value,
) -> Result<Value, SaveError> {
    save(session, "PUT", &format!("/generic/{}/{}", model, id), body).await
}

async fn save(session: &Session, method: &str, path: &str, body: &Value) -> Result<Value, SaveError> {
    let response = client::send_json(session, method, path, body)
        .await
        .map_err(SaveError::Other)?;
    if response.status() == 422 {
        return Err(SaveError::Validation);
    }
    if !response.ok() {
        return Err(SaveError::Other(format!("HTTP {}", response.status())));
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| SaveError::Other(format!("Failed to parse response: {}", e)))
}

pub async fn delete_record(session: &Session, model: &str, id: i64) -> Result<(), String> {
    client::delete(session, &format!("/generic/{}/{}", model, id)).await
}

/// Distinct values of one column, used to seed creatable selects.
pub async fn fetch_distinct(session: &Session, model: &str, field: &str) -> Result<Vec<Value>, String> {
    client::get_json(session, &format!("/generic/{}/distinct/{}", model, field)).await
}

/// Available stock lots for one product.
pub async fn fetch_stock_lots(session: &Session, product_id: i64) -> Result<Vec<StockLot>, String> {
    let response: ListResponse = client::get_json(
        session,
        &format!(
            "/generic/estoque?id_produto={}&situacao={}&limit=100",
            product_id,
            urlencoding::encode(contracts::orders::STOCK_AVAILABLE)
        ),
    )
    .await?;
    Ok(response
        .items
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .filter(|lot: &StockLot| lot.quantidade > 0)
        .collect())
}

// ============================================================================
// Reference resolution
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct RefOption {
    pub id: i64,
    pub label: String,
}

/// How a referenced model is looked up and labeled in a picker.
#[derive(Debug, Clone, PartialEq)]
pub struct RefLookup {
    pub model: String,
    pub label_field: String,
    /// Prepended as `"{code} - {label}"` when present.
    pub code_field: Option<String>,
    /// Restricts search to rows with `situacao=true`.
    pub active_only: bool,
}

impl RefLookup {
    pub fn new(model: impl Into<String>, label_field: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            label_field: label_field.into(),
            code_field: None,
            active_only: false,
        }
    }

    /// Product options read `"{sku} - {descricao}"` and only list active rows.
    pub fn active_products() -> Self {
        Self {
            model: "produtos".to_string(),
            label_field: "descricao".to_string(),
            code_field: Some("sku".to_string()),
            active_only: true,
        }
    }

    fn option_label(&self, record: &Value) -> Option<String> {
        let base = label_of(record, &self.label_field)?;
        match self.code_field.as_deref().and_then(|c| label_of(record, c)) {
            Some(code) => Some(format!("{} - {}", code, base)),
            None => Some(base),
        }
    }
}

fn label_of(record: &Value, label_field: &str) -> Option<String> {
    let v = record.get(label_field)?;
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn missing_label(id: i64) -> String {
    format!("ID {} (Não encontrado)", id)
}

/// One id to one label. Failures degrade to a placeholder label instead of
/// blocking the owning form.
pub async fn resolve_label(session: &Session, lookup: &RefLookup, id: i64) -> String {
    match fetch_record(session, &lookup.model, id).await {
        Ok(record) => lookup
            .option_label(&record)
            .unwrap_or_else(|| format!("ID {}", id)),
        Err(e) => {
            log::warn!("reference lookup {}/{} failed: {}", lookup.model, id, e);
            missing_label(id)
        }
    }
}

/// Search-as-you-type over a referenced model, capped at 20 results.
pub async fn search_references(
    session: &Session,
    lookup: &RefLookup,
    term: &str,
) -> Result<Vec<RefOption>, String> {
    let query = ListQuery {
        limit: 20,
        search_term: term.to_string(),
        status_filter: lookup.active_only.then(|| "true".to_string()),
        ..Default::default()
    };
    let response = fetch_list(session, &lookup.model, &query).await?;
    Ok(response
        .items
        .iter()
        .filter_map(|record| {
            let id = record.get("id")?.as_i64()?;
            let label = lookup
                .option_label(record)
                .unwrap_or_else(|| format!("ID {}", id));
            Some(RefOption { id, label })
        })
        .collect())
}

// ============================================================================
// Dashboard
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardSummary {
    #[serde(default)]
    pub revenue: f64,
    #[serde(default)]
    pub orders: u32,
    #[serde(default)]
    pub to_receive: f64,
    #[serde(default)]
    pub to_pay: f64,
    #[serde(default)]
    pub net_balance: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecentOrder {
    pub id: i64,
    #[serde(default)]
    pub cliente: String,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub situacao: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LowStockItem {
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub produto: String,
    #[serde(default)]
    pub quantidade: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub summary: DashboardSummary,
    #[serde(default)]
    pub recent_orders: Vec<RecentOrder>,
    #[serde(default)]
    pub low_stock: Vec<LowStockItem>,
}

pub async fn fetch_dashboard_stats(
    session: &Session,
    start_date: &str,
    end_date: &str,
) -> Result<DashboardStats, String> {
    client::get_json(
        session,
        &format!("/dashboard/stats?start_date={}&end_date={}", start_date, end_date),
    )
    .await
}

// ============================================================================
// CSV export
// ============================================================================

/// Streams the export endpoint into a browser download. The filename comes
/// from the content-disposition header when the backend sets one.
pub async fn export_csv(session: &Session, model: &str, search_term: &str) -> Result<(), String> {
    let mut path = format!("/generic/{}/export", model);
    let term = search_term.trim();
    if !term.is_empty() {
        path.push_str(&format!("?search_term={}", urlencoding::encode(term)));
    }

    let response = client::get(session, &path).await?;
    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }

    let filename = response
        .headers()
        .get("content-disposition")
        .and_then(|h| parse_disposition_filename(&h))
        .unwrap_or_else(|| format!("{}_export.csv", model));

    let content = response
        .text()
        .await
        .map_err(|e| format!("Failed to read response: {}", e))?;

    let blob = create_csv_blob(&content)?;
    download_blob(&blob, &filename)
}

fn parse_disposition_filename(header: &str) -> Option<String> {
    let marker = "filename=";
    let start = header.find(marker)? + marker.len();
    let raw = header[start..].split(';').next()?.trim();
    let name = raw.trim_matches('"');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn create_csv_blob(content: &str) -> Result<Blob, String> {
    let array = js_sys::Array::new();
    array.push(&wasm_bindgen::JsValue::from_str(content));

    let properties = BlobPropertyBag::new();
    properties.set_type("text/csv;charset=utf-8;");

    Blob::new_with_str_sequence_and_options(&array, &properties)
        .map_err(|e| format!("Failed to create blob: {:?}", e))
}

fn download_blob(blob: &Blob, filename: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document object")?;

    let url = Url::create_object_url_with_blob(blob)
        .map_err(|e| format!("Failed to create object URL: {:?}", e))?;

    let anchor = document
        .create_element("a")
        .map_err(|e| format!("Failed to create anchor: {:?}", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| format!("Failed to cast to anchor: {:?}", e))?;

    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor
        .style()
        .set_property("display", "none")
        .map_err(|e| format!("Failed to set style: {:?}", e))?;

    document
        .body()
        .ok_or("No body element")?
        .append_child(&anchor)
        .map_err(|e| format!("Failed to append anchor: {:?}", e))?;

    anchor.click();

    document
        .body()
        .ok_or("No body element")?
        .remove_child(&anchor)
        .map_err(|e| format!("Failed to remove anchor: {:?}", e))?;

    Url::revoke_object_url(&url).map_err(|e| format!("Failed to revoke URL: {:?}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{missing_label, parse_disposition_filename, RefLookup};
    use serde_json::json;

    #[test]
    fn product_options_label_with_sku() {
        let lookup = RefLookup::active_products();
        assert!(lookup.active_only);

        let record = json!({"id": 1, "sku": "CX-0040", "descricao": "Caixa 40x30"});
        assert_eq!(
            lookup.option_label(&record),
            Some("CX-0040 - Caixa 40x30".to_string())
        );

        // a row without a sku still gets its plain label
        let bare = json!({"id": 2, "descricao": "Caixa avulsa"});
        assert_eq!(lookup.option_label(&bare), Some("Caixa avulsa".to_string()));
    }

    #[test]
    fn plain_lookup_uses_the_label_field_alone() {
        let lookup = RefLookup::new("clientes", "nome_razao");
        assert!(!lookup.active_only);
        let record = json!({"id": 7, "nome_razao": "ACME Ltda", "sku": "ignored"});
        assert_eq!(lookup.option_label(&record), Some("ACME Ltda".to_string()));
    }

    #[test]
    fn unresolved_reference_placeholder_casing() {
        assert_eq!(missing_label(42), "ID 42 (Não encontrado)");
    }

    #[test]
    fn disposition_filename_variants() {
        assert_eq!(
            parse_disposition_filename("attachment; filename=\"produtos.csv\""),
            Some("produtos.csv".to_string())
        );
        assert_eq!(
            parse_disposition_filename("attachment; filename=produtos.csv; size=10"),
            Some("produtos.csv".to_string())
        );
        assert_eq!(parse_disposition_filename("attachment"), None);
    }
}
