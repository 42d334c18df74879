use contracts::metadata::FieldDescriptor;
use contracts::rules::{
    format_formula, FormulaToken, Rule, RuleSet, CONTEXT_VARIABLES, OPERATORS, TRIGGER_OPTIONS,
};
use leptos::prelude::*;
use serde_json::Value;

use super::FieldLabel;
use crate::shared::icons::icon;

#[derive(Clone, Copy, PartialEq)]
enum Slot {
    Itens,
    Altura,
    Largura,
    Comprimento,
    Peso,
}

impl Slot {
    const ALL: [Slot; 5] = [
        Slot::Itens,
        Slot::Altura,
        Slot::Largura,
        Slot::Comprimento,
        Slot::Peso,
    ];

    fn label(self) -> &'static str {
        match self {
            Slot::Itens => "Fórmula: Itens no Volume",
            Slot::Altura => "Fórmula: Altura (cm)",
            Slot::Largura => "Fórmula: Largura (cm)",
            Slot::Comprimento => "Fórmula: Comprimento (cm)",
            Slot::Peso => "Fórmula: Peso (kg)",
        }
    }

    fn of(self, rule: &Rule) -> &Vec<FormulaToken> {
        match self {
            Slot::Itens => &rule.formula_itens,
            Slot::Altura => &rule.formula_altura,
            Slot::Largura => &rule.formula_largura,
            Slot::Comprimento => &rule.formula_comprimento,
            Slot::Peso => &rule.formula_peso,
        }
    }

    fn of_mut(self, rule: &mut Rule) -> &mut Vec<FormulaToken> {
        match self {
            Slot::Itens => &mut rule.formula_itens,
            Slot::Altura => &mut rule.formula_altura,
            Slot::Largura => &mut rule.formula_largura,
            Slot::Comprimento => &mut rule.formula_comprimento,
            Slot::Peso => &mut rule.formula_peso,
        }
    }
}

fn apply(set: RwSignal<RuleSet>, on_change: Callback<Value>, edit: impl FnOnce(&mut RuleSet)) {
    set.update(edit);
    on_change.run(set.get_untracked().to_draft());
}

/// Visual builder for packaging rule sets. Every mutation immediately writes
/// the wire-format array back to the draft.
#[component]
pub fn RuleBuilderInput(
    field: FieldDescriptor,
    value: Value,
    on_change: Callback<Value>,
) -> impl IntoView {
    let set = RwSignal::new(RuleSet::from_draft(&value));

    let add_rule = move |_| apply(set, on_change, RuleSet::add_rule);

    let remove_rule = move |index: usize| {
        let mut blocked = None;
        apply(set, on_change, |s| {
            if let Err(msg) = s.remove_rule(index) {
                blocked = Some(msg);
            }
        });
        if let Some(msg) = blocked {
            if let Some(w) = web_sys::window() {
                let _ = w.alert_with_message(&msg);
            }
        }
    };

    view! {
        <div class="field field--wide">
            <FieldLabel field=field />
            <div class="rules">
                {move || {
                    set.get()
                        .rules
                        .iter()
                        .enumerate()
                        .map(|(index, editable)| {
                            rule_card(set, on_change, index, editable.uid, remove_rule)
                        })
                        .collect_view()
                }}
            </div>
            <button type="button" class="btn btn--secondary" on:click=add_rule>
                {icon("plus")}
                " Adicionar Regra"
            </button>
        </div>
    }
}

fn rule_card(
    set: RwSignal<RuleSet>,
    on_change: Callback<Value>,
    index: usize,
    uid: uuid::Uuid,
    remove_rule: impl Fn(usize) + Copy + 'static,
) -> impl IntoView {
    // snapshot accessor; the whole card rerenders on any rule-set change
    let rule_at = move || set.get_untracked().rules.get(index).cloned();

    let selection = rule_at().map(|r| r.trigger_selection()).unwrap_or("SEMPRE");
    let trigger_value = rule_at()
        .and_then(|r| r.rule.valor_gatilho.clone())
        .unwrap_or_default();
    let priority = rule_at().map(|r| r.rule.prioridade).unwrap_or(10);
    let volume_completo = rule_at().map(|r| r.volume_completo).unwrap_or(false);
    let shows_trigger_value = selection != "SEMPRE";

    let on_trigger = move |raw: String| {
        apply(set, on_change, |s| {
            if let Some(r) = s.rules.get_mut(index) {
                r.set_trigger(&raw);
            }
        });
    };

    let on_trigger_value = move |raw: String| {
        apply(set, on_change, |s| {
            if let Some(r) = s.rules.get_mut(index) {
                r.set_trigger_value(&raw);
            }
        });
    };

    let on_priority = move |raw: String| {
        let parsed = raw.trim().parse::<i64>().unwrap_or(10);
        apply(set, on_change, |s| {
            if let Some(r) = s.rules.get_mut(index) {
                r.rule.prioridade = parsed;
            }
        });
    };

    let volume_summary = move || {
        let qty = rule_at()
            .and_then(|r| r.rule.valor_gatilho.clone())
            .unwrap_or_else(|| "?".into());
        format!("O volume conterá exatamente {} itens.", qty)
    };

    view! {
        <div class="rules__card" id=format!("rule-{uid}")>
            <div class="rules__head">
                <span class="rules__title">{format!("Regra {}", index + 1)}</span>
                <button
                    type="button"
                    class="btn btn--icon btn--danger"
                    title="Remover regra"
                    on:click=move |_| remove_rule(index)
                >
                    {icon("delete")}
                </button>
            </div>
            <div class="rules__row">
                <label class="field__label">"Condição de Gatilho"</label>
                <select
                    class="field__input"
                    prop:value=selection
                    on:change=move |ev| on_trigger(event_target_value(&ev))
                >
                    {TRIGGER_OPTIONS
                        .into_iter()
                        .map(|(value, label)| view! { <option value=value>{label}</option> })
                        .collect_view()}
                </select>
                {shows_trigger_value
                    .then(|| view! {
                        <input
                            type="text"
                            class="field__input"
                            placeholder=if selection == "ENTRE" { "ex: 5,10" } else { "Valor" }
                            prop:value=trigger_value
                            on:change=move |ev| on_trigger_value(event_target_value(&ev))
                        />
                    })}
                <label class="field__label">"Prioridade"</label>
                <input
                    type="number"
                    class="field__input rules__priority"
                    prop:value=priority.to_string()
                    on:change=move |ev| on_priority(event_target_value(&ev))
                />
            </div>
            {Slot::ALL
                .into_iter()
                .map(|slot| {
                    if slot == Slot::Itens && volume_completo {
                        view! {
                            <div class="rules__formula rules__formula--fixed">
                                <label class="field__label">{slot.label()}</label>
                                <p class="rules__summary">{volume_summary()}</p>
                            </div>
                        }
                        .into_any()
                    } else {
                        formula_editor(set, on_change, index, slot).into_any()
                    }
                })
                .collect_view()}
        </div>
    }
}

fn formula_editor(
    set: RwSignal<RuleSet>,
    on_change: Callback<Value>,
    index: usize,
    slot: Slot,
) -> impl IntoView {
    let tokens = move || {
        set.get()
            .rules
            .get(index)
            .map(|r| slot.of(&r.rule).clone())
            .unwrap_or_default()
    };

    let push = move |token: FormulaToken| {
        apply(set, on_change, |s| {
            if let Some(r) = s.rules.get_mut(index) {
                slot.of_mut(&mut r.rule).push(token);
            }
        });
    };

    let remove_token = move |at: usize| {
        apply(set, on_change, |s| {
            if let Some(r) = s.rules.get_mut(index) {
                let formula = slot.of_mut(&mut r.rule);
                if at < formula.len() {
                    formula.remove(at);
                }
            }
        });
    };

    let (number, set_number) = signal(String::new());
    let add_number = move |_| {
        let raw = number.get_untracked().trim().to_string();
        if !raw.is_empty() && raw.parse::<f64>().is_ok() {
            push(FormulaToken::Numero(raw));
            set_number.set(String::new());
        }
    };

    let add_variable = move |raw: String| {
        if !raw.is_empty() {
            push(FormulaToken::Variavel(raw));
        }
    };

    view! {
        <div class="rules__formula">
            <label class="field__label">{slot.label()}</label>
            <div class="rules__tokens">
                {move || {
                    tokens()
                        .into_iter()
                        .enumerate()
                        .map(|(at, token)| {
                            let kind = match token {
                                FormulaToken::Variavel(_) => "token token--var",
                                FormulaToken::Operador(_) => "token token--op",
                                FormulaToken::Numero(_) => "token token--num",
                            };
                            view! {
                                <span class=kind>
                                    {token.text().to_string()}
                                    <button
                                        type="button"
                                        class="token__remove"
                                        on:click=move |_| remove_token(at)
                                    >
                                        {icon("x")}
                                    </button>
                                </span>
                            }
                        })
                        .collect_view()
                }}
            </div>
            <div class="rules__palette">
                <select
                    class="field__input"
                    prop:value=""
                    on:change=move |ev| add_variable(event_target_value(&ev))
                >
                    <option value="">"Variável..."</option>
                    {CONTEXT_VARIABLES
                        .into_iter()
                        .map(|name| view! { <option value=name>{name}</option> })
                        .collect_view()}
                </select>
                {OPERATORS
                    .into_iter()
                    .map(|op| {
                        view! {
                            <button
                                type="button"
                                class="btn btn--op"
                                on:click=move |_| push(FormulaToken::Operador(op.to_string()))
                            >
                                {op}
                            </button>
                        }
                    })
                    .collect_view()}
                <input
                    type="text"
                    class="field__input rules__number"
                    placeholder="Número"
                    prop:value=move || number.get()
                    on:input=move |ev| set_number.set(event_target_value(&ev))
                />
                <button type="button" class="btn btn--secondary" on:click=add_number>
                    "OK"
                </button>
            </div>
            <p class="rules__preview">
                {move || {
                    let preview = format_formula(&tokens());
                    if preview.is_empty() { "(vazia)".to_string() } else { preview }
                }}
            </p>
        </div>
    }
}
