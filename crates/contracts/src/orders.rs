//! Stock-vs-production allocation for order programming.
//!
//! Each order line partitions its required quantity between withdrawals from
//! existing stock lots and a production remainder. The partition invariant
//! `a_retirar + a_produzir == quantidade` holds after every edit; exact
//! per-lot sums are enforced at submit time.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// `situacao` value a lot must carry to be eligible for withdrawal.
pub const STOCK_AVAILABLE: &str = "Disponivel";
/// Order status emitted when programming is confirmed.
pub const PRODUCTION_STATUS: &str = "Produção";

/// One `estoque` record as returned by the generic endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockLot {
    pub id: i64,
    #[serde(default)]
    pub lote: Option<String>,
    #[serde(default)]
    pub quantidade: u32,
    #[serde(default)]
    pub deposito: Option<String>,
    #[serde(default)]
    pub rua: Option<String>,
    #[serde(default)]
    pub nivel: Option<String>,
}

impl StockLot {
    pub fn lot_code(&self) -> &str {
        self.lote.as_deref().filter(|s| !s.is_empty()).unwrap_or("-")
    }

    /// Human-readable location built from the warehouse columns.
    pub fn location(&self) -> String {
        let parts: Vec<&str> = [&self.deposito, &self.rua, &self.nivel]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            "-".to_string()
        } else {
            parts.join(" / ")
        }
    }
}

/// One line of a `pedidos` record's `itens` array. Unknown columns are kept
/// in `extra` so the mutated array round-trips unchanged through a PUT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub id_produto: i64,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub quantidade: u32,
    #[serde(default)]
    pub numero_a_retirar: u32,
    #[serde(default)]
    pub numero_a_produzir: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrderItem {
    pub fn display_name(&self) -> String {
        self.descricao
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Produto {}", self.id_produto))
    }
}

/// Editable allocation state for one order line.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationLine {
    pub item: OrderItem,
    pub lots: Vec<StockLot>,
    /// Per-lot assigned quantities, keyed by lot id.
    pub withdrawals: BTreeMap<i64, u32>,
    pub product_label: String,
}

impl AllocationLine {
    /// Wraps a fetched line. A line with no prior allocation defaults the
    /// whole quantity to production.
    pub fn new(mut item: OrderItem, lots: Vec<StockLot>, product_label: String) -> Self {
        if item.numero_a_retirar == 0 && item.numero_a_produzir == 0 && item.quantidade > 0 {
            item.numero_a_produzir = item.quantidade;
        }
        Self {
            item,
            lots,
            withdrawals: BTreeMap::new(),
            product_label,
        }
    }

    pub fn required(&self) -> u32 {
        self.item.quantidade
    }

    pub fn to_withdraw(&self) -> u32 {
        self.item.numero_a_retirar
    }

    pub fn to_produce(&self) -> u32 {
        self.item.numero_a_produzir
    }

    pub fn has_lots(&self) -> bool {
        !self.lots.is_empty()
    }

    fn lot_available(&self, lot_id: i64) -> u32 {
        self.lots
            .iter()
            .find(|l| l.id == lot_id)
            .map(|l| l.quantidade)
            .unwrap_or(0)
    }

    fn assigned_total(&self) -> u32 {
        self.withdrawals.values().sum()
    }

    /// Direct production edit for lines without lots. Clamped so the
    /// withdrawal remainder never goes negative.
    pub fn set_to_produce(&mut self, qty: u32) {
        let produce = qty.min(self.required());
        self.item.numero_a_produzir = produce;
        self.item.numero_a_retirar = self.required() - produce;
    }

    /// Assigns a withdrawal quantity to one lot. The quantity is clamped to
    /// the lot's availability and to what the line still needs; zero removes
    /// the assignment. The line totals are recomputed from the lot sums.
    pub fn set_withdrawal(&mut self, lot_id: i64, qty: u32) {
        let others: u32 = self
            .withdrawals
            .iter()
            .filter(|(id, _)| **id != lot_id)
            .map(|(_, q)| *q)
            .sum();
        let headroom = self.required().saturating_sub(others);
        let qty = qty.min(self.lot_available(lot_id)).min(headroom);
        if qty == 0 {
            self.withdrawals.remove(&lot_id);
        } else {
            self.withdrawals.insert(lot_id, qty);
        }
        let withdraw = self.assigned_total();
        self.item.numero_a_retirar = withdraw;
        self.item.numero_a_produzir = self.required().saturating_sub(withdraw);
    }

    pub fn validate(&self) -> Result<(), String> {
        let name = self.item.display_name();
        let (w, p, q) = (self.to_withdraw(), self.to_produce(), self.required());
        if w + p != q {
            return Err(format!(
                "Erro no item \"{name}\": A soma de 'A Retirar' ({w}) e 'A Produzir' ({p}) \
                 deve ser igual à Quantidade Total ({q})."
            ));
        }
        if self.has_lots() && w > 0 {
            let assigned = self.assigned_total();
            if assigned != w {
                return Err(format!(
                    "Erro no item \"{name}\": A soma das retiradas por lote ({assigned}) \
                     deve ser igual ao total 'A Retirar' ({w})."
                ));
            }
        }
        Ok(())
    }

    fn withdrawal_records(&self) -> Vec<WithdrawalRecord> {
        self.withdrawals
            .iter()
            .map(|(lot_id, qty)| {
                let lot = self.lots.iter().find(|l| l.id == *lot_id);
                WithdrawalRecord {
                    id_produto: self.item.id_produto,
                    quantidade: *qty,
                    id_estoque_origem: *lot_id,
                    lote: lot.and_then(|l| l.lote.clone()),
                    localizacao: lot.map(StockLot::location).unwrap_or_else(|| "-".into()),
                }
            })
            .collect()
    }
}

/// Flattened lot reservation sent alongside the order update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalRecord {
    pub id_produto: i64,
    pub quantidade: u32,
    pub id_estoque_origem: i64,
    pub lote: Option<String>,
    pub localizacao: String,
}

/// Body of the `PUT /generic/pedidos/{id}` issued when programming is
/// confirmed.
#[derive(Debug, Clone, Serialize)]
pub struct FinalizePayload {
    pub situacao: String,
    pub data_finalizacao: String,
    pub ordem_finalizacao: String,
    pub itens: Vec<OrderItem>,
    pub retiradas_estoque: Vec<WithdrawalRecord>,
}

impl FinalizePayload {
    /// Validates every line and builds the payload. The first offending line
    /// blocks the build with its message.
    pub fn build(
        data_finalizacao: String,
        ordem_finalizacao: String,
        lines: &[AllocationLine],
    ) -> Result<Self, String> {
        for line in lines {
            line.validate()?;
        }
        Ok(Self {
            situacao: PRODUCTION_STATUS.to_string(),
            data_finalizacao,
            ordem_finalizacao,
            itens: lines.iter().map(|l| l.item.clone()).collect(),
            retiradas_estoque: lines.iter().flat_map(AllocationLine::withdrawal_records).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(id_produto: i64, quantidade: u32) -> OrderItem {
        OrderItem {
            id: None,
            id_produto,
            descricao: Some(format!("Item {id_produto}")),
            quantidade,
            numero_a_retirar: 0,
            numero_a_produzir: 0,
            extra: Map::new(),
        }
    }

    fn lot(id: i64, quantidade: u32) -> StockLot {
        StockLot {
            id,
            lote: Some(format!("L{id}")),
            quantidade,
            deposito: Some("D1".into()),
            rua: None,
            nivel: None,
        }
    }

    fn sum_invariant(line: &AllocationLine) {
        assert_eq!(line.to_withdraw() + line.to_produce(), line.required());
    }

    #[test]
    fn fresh_line_defaults_to_production() {
        let line = AllocationLine::new(item(1, 50), vec![], "Caixa".into());
        assert_eq!(line.to_produce(), 50);
        assert_eq!(line.to_withdraw(), 0);
        sum_invariant(&line);
    }

    #[test]
    fn prior_allocation_is_preserved() {
        let mut it = item(1, 50);
        it.numero_a_retirar = 20;
        it.numero_a_produzir = 30;
        let line = AllocationLine::new(it, vec![], "Caixa".into());
        assert_eq!(line.to_produce(), 30);
        assert_eq!(line.to_withdraw(), 20);
    }

    #[test]
    fn production_edit_recomputes_withdrawal() {
        let mut line = AllocationLine::new(item(1, 50), vec![], "Caixa".into());
        line.set_to_produce(30);
        assert_eq!(line.to_produce(), 30);
        assert_eq!(line.to_withdraw(), 20);
        sum_invariant(&line);

        // overshoot clamps
        line.set_to_produce(90);
        assert_eq!(line.to_produce(), 50);
        assert_eq!(line.to_withdraw(), 0);
        sum_invariant(&line);
    }

    #[test]
    fn lot_assignment_recomputes_line_totals() {
        let mut line = AllocationLine::new(item(1, 50), vec![lot(10, 15), lot(11, 40)], "Caixa".into());
        line.set_withdrawal(10, 15);
        line.set_withdrawal(11, 20);
        assert_eq!(line.to_withdraw(), 35);
        assert_eq!(line.to_produce(), 15);
        sum_invariant(&line);

        // zero removes the assignment
        line.set_withdrawal(10, 0);
        assert_eq!(line.to_withdraw(), 20);
        assert!(!line.withdrawals.contains_key(&10));
        sum_invariant(&line);
    }

    #[test]
    fn lot_assignment_is_clamped_to_availability_and_need() {
        let mut line = AllocationLine::new(item(1, 20), vec![lot(10, 15), lot(11, 40)], "Caixa".into());
        line.set_withdrawal(10, 99);
        assert_eq!(line.withdrawals[&10], 15);
        line.set_withdrawal(11, 99);
        assert_eq!(line.withdrawals[&11], 5);
        assert_eq!(line.to_withdraw(), 20);
        assert_eq!(line.to_produce(), 0);
        sum_invariant(&line);
    }

    #[test]
    fn validation_rejects_unassigned_withdrawals() {
        let mut it = item(1, 50);
        it.numero_a_retirar = 20;
        it.numero_a_produzir = 30;
        let line = AllocationLine::new(it, vec![lot(10, 100)], "Caixa".into());
        let err = line.validate().unwrap_err();
        assert!(err.contains("retiradas por lote"), "{err}");
    }

    #[test]
    fn validation_rejects_broken_sum() {
        let mut it = item(1, 50);
        it.numero_a_retirar = 10;
        it.numero_a_produzir = 10;
        let line = AllocationLine::new(it, vec![], "Caixa".into());
        let err = line.validate().unwrap_err();
        assert!(err.contains("Quantidade Total"), "{err}");
    }

    #[test]
    fn payload_flattens_withdrawal_records() {
        let mut line = AllocationLine::new(item(7, 30), vec![lot(10, 15), lot(11, 40)], "Caixa".into());
        line.set_withdrawal(10, 10);
        line.set_withdrawal(11, 5);

        let payload =
            FinalizePayload::build("2026-08-27".into(), "1.0".into(), &[line]).unwrap();
        assert_eq!(payload.situacao, PRODUCTION_STATUS);
        assert_eq!(payload.retiradas_estoque.len(), 2);
        let rec = &payload.retiradas_estoque[0];
        assert_eq!(rec.id_produto, 7);
        assert_eq!(rec.id_estoque_origem, 10);
        assert_eq!(rec.quantidade, 10);
        assert_eq!(rec.lote.as_deref(), Some("L10"));
        assert_eq!(rec.localizacao, "D1");
        assert_eq!(payload.itens[0].numero_a_retirar, 15);
        assert_eq!(payload.itens[0].numero_a_produzir, 15);
    }

    #[test]
    fn payload_build_propagates_line_errors() {
        let mut it = item(1, 50);
        it.numero_a_retirar = 5;
        it.numero_a_produzir = 5;
        let bad = AllocationLine::new(it, vec![], "Caixa".into());
        assert!(FinalizePayload::build("2026-08-27".into(), "1.0".into(), &[bad]).is_err());
    }

    #[test]
    fn order_item_round_trips_unknown_columns() {
        let raw = json!({
            "id": 3,
            "id_produto": 9,
            "quantidade": 4,
            "numero_a_retirar": 0,
            "numero_a_produzir": 0,
            "valor_unitario": 12.5
        });
        let item: OrderItem = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(item.extra["valor_unitario"], json!(12.5));
        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["valor_unitario"], json!(12.5));
        assert_eq!(back["id_produto"], json!(9));
    }

    #[test]
    fn lot_location_joins_warehouse_columns() {
        let mut l = lot(1, 10);
        l.rua = Some("R2".into());
        assert_eq!(l.location(), "D1 / R2");
        l.deposito = None;
        l.rua = None;
        assert_eq!(l.location(), "-");
    }
}
