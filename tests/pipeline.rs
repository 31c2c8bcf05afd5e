//! End-to-end flow of one testcase: a generator seeded by its argument list
//! produces the parameters, encodes them to the testcase file, and a
//! validator/solution reads them back and hands them to foreign code
//! through the raw bridge.

use anyhow::Result;
use pretty_assertions::assert_eq;

use casegen::{Decoder, Encoder, Param, RawView, ScalarKind, SeededRng, Shape, Value};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Emulate a generator invocation: build the parameters of a testcase from
/// the generation script.
fn generate(script: &[&str]) -> Result<Vec<Value>> {
    let mut rng = SeededRng::from_script(script)?;
    let rows = rng.randint(2, 6);
    let cols = rng.randint(2, 6);
    let matrix: Vec<Vec<i64>> = (0..rows)
        .map(|_| (0..cols).map(|_| rng.randint(-1000, 1000)).collect())
        .collect();
    let labels = rng.permutation(rows, 1)?;
    let flag = rng.randbool();
    Ok(vec![
        Value::from(matrix),
        Value::from(labels),
        Value::from(flag),
    ])
}

fn encode_all(values: &[Value]) -> Result<Vec<u8>> {
    let mut encoded = Vec::new();
    let mut encoder = Encoder::new(&mut encoded);
    for value in values {
        encoder.put_checked(value)?;
    }
    Ok(encoded)
}

#[test]
fn generate_encode_decode() -> Result<()> {
    init_logger();
    let params: Vec<Param> = serde_json::from_str(
        r#"[
            {"name": "matrix", "type": "long", "dimension": 2},
            {"name": "labels", "type": "long long", "dimension": 1},
            {"name": "flag", "type": "bool", "dimension": 0}
        ]"#,
    )?;

    let values = generate(&["pipeline", "42"])?;
    let testcase = encode_all(&values)?;

    // The consumer reads the parameters back, sequentially, with the
    // shapes declared in the task configuration.
    let mut decoder = Decoder::new(testcase.as_slice());
    for (param, expected) in params.iter().zip(&values) {
        let decoded = decoder.get_checked(param.shape())?;
        assert_eq!(&decoded, expected);
    }
    Ok(())
}

#[test]
fn identical_scripts_reproduce_the_testcase() -> Result<()> {
    init_logger();
    let first = encode_all(&generate(&["pipeline", "42"])?)?;
    let second = encode_all(&generate(&["pipeline", "42"])?)?;
    assert_eq!(first, second);

    let other = encode_all(&generate(&["pipeline", "43"])?)?;
    assert_ne!(first, other);
    Ok(())
}

#[test]
fn raw_bridge_hands_over_decoded_parameters() -> Result<()> {
    init_logger();
    let values = generate(&["raw", "7"])?;
    let testcase = encode_all(&values)?;

    let shape = Shape::new(ScalarKind::Long, 2);
    let matrix = Decoder::new(testcase.as_slice()).get(shape)?;

    // The solution adapter borrows the raw form, the foreign code walks
    // it, and the adapter releases it exactly once.
    let view = RawView::from_value(&matrix, shape)?;
    assert_eq!(view.to_value(), matrix);
    view.release();
    Ok(())
}
