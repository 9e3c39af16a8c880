//! Structural laws of the translation pipeline

use async_trait::async_trait;
use proptest::prelude::*;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use translate_core::{Language, TranslateError, TranslationPipeline, TranslationProvider};

/// Reverses text so any accidental translation of an identifier is visible
struct ReversingProvider;

#[async_trait]
impl TranslationProvider for ReversingProvider {
    fn name(&self) -> &'static str {
        "reversing"
    }

    fn supports(&self, from: Language, to: Language) -> bool {
        from != to
    }

    async fn translate(
        &self,
        text: &str,
        _from: Language,
        _to: Language,
    ) -> Result<String, TranslateError> {
        Ok(format!("~{}", text.chars().rev().collect::<String>()))
    }
}

fn pipeline() -> TranslationPipeline {
    TranslationPipeline::new(2, Duration::ZERO, Duration::ZERO).with_provider(Arc::new(ReversingProvider))
}

fn run<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
        .block_on(future)
}

fn language() -> impl Strategy<Value = Language> {
    prop::sample::select(Language::ALL.to_vec())
}

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| Value::from(n)),
        "[a-zA-Z ]{0,20}".prop_map(Value::String),
    ];

    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..4)
                .prop_map(|fields| Value::Object(fields.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

proptest! {
    #[test]
    fn same_language_is_identity(value in json_value(), lang in language()) {
        let output = run(pipeline().translate(&value, lang, lang));
        prop_assert_eq!(output, value);
    }

    #[test]
    fn clause_id_survives_translation(
        clause_id in "clause-[0-9]{1,3}",
        body in json_value(),
        source in language(),
        target in language(),
    ) {
        let mut fields = Map::new();
        fields.insert("clauseId".to_string(), Value::String(clause_id.clone()));
        fields.insert("body".to_string(), body);
        let input = Value::Object(fields);

        let output = run(pipeline().translate(&input, target, source));
        prop_assert_eq!(&output["clauseId"], &Value::String(clause_id));
    }

    #[test]
    fn shape_is_preserved(value in json_value()) {
        let output = run(pipeline().translate(&value, Language::Es, Language::En));
        prop_assert_eq!(shape(&output), shape(&value));
    }
}

/// The value with every string blanked out
fn shape(value: &Value) -> Value {
    match value {
        Value::String(_) => Value::String(String::new()),
        Value::Array(items) => Value::Array(items.iter().map(shape).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(key, field)| (key.clone(), shape(field)))
                .collect(),
        ),
        other => other.clone(),
    }
}
