//! Integration tests for building, merging and evaluating choice expressions
//! through the public API.

use choice_rs::graph::{GraphVisualizer, depth, has_deferred, node_count};
use choice_rs::operations::{add, article, equals, index, join, title_case};
use choice_rs::{Choice, ChoiceError, Result, Sampler, Side, Value, delayed, evaluate, of};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::thread;

fn coin() -> Choice {
    Choice::flat(["heads", "tails"]).unwrap()
}

#[test]
fn test_merge_chain_with_question_mark() -> Result<()> {
    let choice = Choice::weighted(1.0, "a")?
        .or(Choice::weighted(2.0, "b"))?
        .or(Choice::otherwise("c", Some(10.0)))?;

    let weights: Vec<Option<f64>> = choice.outcomes().iter().map(|o| o.weight()).collect();
    assert_eq!(weights, vec![Some(1.0), Some(2.0), Some(7.0)]);
    assert_eq!(choice.total(), Some(10.0));
    assert!(choice.is_saturated());
    Ok(())
}

#[test]
fn test_merge_errors() {
    assert_eq!(
        Choice::weighted(1.0, "a").and_then(|c| c.or(Choice::otherwise("b", None))),
        Err(ChoiceError::UnanchoredRemainder)
    );
    assert_eq!(
        Choice::either(
            Choice::otherwise("a", Some(100.0)),
            Choice::percentage(10.0, "b")
        ),
        Err(ChoiceError::MisplacedRemainder)
    );
    assert_eq!(
        Choice::either(Choice::percentage(100.0, "a"), Choice::percentage(10.0, "b")),
        Err(ChoiceError::Saturated {
            side: Side::Left,
            total: 100.0
        })
    );
    assert_eq!(
        Choice::either(Choice::weighted(1.0, "a"), Choice::percentage(100.0, "b")),
        Err(ChoiceError::Saturated {
            side: Side::Right,
            total: 100.0
        })
    );
    assert_eq!(
        Choice::either(
            Choice::percentage(10.0, "a"),
            Choice::otherwise("b", Some(50.0))
        ),
        Err(ChoiceError::TotalMismatch {
            left: 100.0,
            right: 50.0
        })
    );
    assert_eq!(
        Choice::either(Choice::percentage(60.0, "a"), Choice::percentage(50.0, "b")),
        Err(ChoiceError::Overflow { excess: 10.0 })
    );
    assert_eq!(
        Choice::flat(Vec::<Choice>::new()),
        Err(ChoiceError::EmptySequence)
    );
}

#[test]
fn test_saturated_chain_cannot_grow() {
    let full = Choice::percentage(20.0, "a")
        .and_then(|c| c.or(Choice::otherwise("b", None)))
        .unwrap();
    assert!(matches!(
        full.or("c"),
        Err(ChoiceError::Saturated {
            side: Side::Left,
            ..
        })
    ));
}

#[test]
#[allow(clippy::float_cmp)]
fn test_of_macro_mixes_operands() {
    let choice = of!["a", 1, true, Choice::weighted(2.0, Value::null())].unwrap();
    assert_eq!(choice.outcomes().len(), 4);
    assert_eq!(choice.summed(), 5.0);
    assert_eq!(
        choice.to_string(),
        "of(weighted(1, \"a\"), weighted(1, 1), weighted(1, true), weighted(2, null))"
    );
}

#[test]
fn test_totaled_rendering_uses_fractions() {
    let choice = Choice::weighted(20.0, "a")
        .and_then(|c| c.or(Choice::otherwise("b", Some(100.0))))
        .unwrap();
    assert_eq!(
        choice.to_string(),
        "of(weighted(0.2, \"a\"), weighted(0.8, \"b\"))"
    );
}

#[test]
fn test_deferred_rendering() {
    let expr = add(Choice::solo(1), coin());
    assert_eq!(
        expr.to_string(),
        "of(weighted(1, add(of(weighted(1, 1)), of(weighted(1, \"heads\"), weighted(1, \"tails\")))))"
    );
}

#[test]
fn test_nested_structure_evaluates_exactly() {
    let nested = Choice::solo(Value::map([(
        "foo",
        Value::map([(
            "bar",
            Value::seq([
                Value::from(1),
                Value::from(3),
                Value::seq([Value::map([("q", Choice::solo(5))])]),
            ]),
        )]),
    )]));
    let expected = Value::map([(
        "foo",
        Value::map([(
            "bar",
            Value::seq([
                Value::from(1),
                Value::from(3),
                Value::seq([Value::map([("q", 5)])]),
            ]),
        )]),
    )]);

    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(nested.evaluate(&mut rng).unwrap(), expected);
}

#[test]
fn test_identical_seeds_replay_identically() {
    let expr: Value = Value::seq([
        Value::from(coin()),
        add(Choice::flat([1, 2, 3]).unwrap(), Choice::flat([10, 20]).unwrap()).into(),
        Value::map([("k", coin())]),
    ]);

    let first = Sampler::seeded(99).take_samples(&expr, 200).unwrap();
    let second = Sampler::seeded(99).take_samples(&expr, 200).unwrap();
    assert_eq!(first, second);
    assert!(first.iter().all(Value::is_concrete));
}

#[test]
fn test_combinators_compose() {
    let greeting = join([
        Value::from(title_case("look: ")),
        Value::from(article(Choice::flat(["owl", "zebra"]).unwrap())),
    ]);
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..20 {
        let text = greeting.evaluate(&mut rng).unwrap();
        assert!(
            text == Value::from("Look: an owl") || text == Value::from("Look: a zebra"),
            "unexpected {text}"
        );
    }
}

#[test]
fn test_consistent_lookup_after_sampling_once() {
    let pronouns = Choice::flat([
        Value::map([("their", "his"), ("they", "he")]),
        Value::map([("their", "her"), ("they", "she")]),
    ])
    .unwrap();

    let mut sampler = Sampler::seeded(5);
    for _ in 0..20 {
        let picked = pronouns.evaluate(sampler.rng()).unwrap();
        let sentence = join([
            Value::from(index(picked.clone(), "they")),
            Value::from(" lost "),
            Value::from(index(picked, "their")),
            Value::from(" way"),
        ]);
        let text = sampler.evaluate(&sentence.into()).unwrap();
        assert!(
            text == Value::from("he lost his way") || text == Value::from("she lost her way"),
            "unexpected {text}"
        );
    }
}

#[test]
fn test_user_combinator_errors_surface_at_evaluation() {
    let halve = delayed("halve", |args| {
        let [x] = args.exactly::<1>("halve")?;
        match x.as_int() {
            Some(n) if n % 2 == 0 => Ok(Value::from(n / 2)),
            _ => Err(ChoiceError::combinator("halve", format!("cannot halve {x}"))),
        }
    });

    let fine = halve.call([4]);
    let odd = halve.call([3]);
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(fine.evaluate(&mut rng).unwrap(), Value::from(2));
    assert_eq!(
        odd.evaluate(&mut rng),
        Err(ChoiceError::combinator("halve", "cannot halve 3"))
    );
}

#[test]
fn test_equality_of_sampled_values() {
    let same = equals(Choice::solo(2), Choice::solo(2.0));
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(evaluate(&same.into(), &mut rng).unwrap(), Value::from(true));
}

#[test]
fn test_graph_introspection() {
    let expr: Value = join([Value::from("a "), article(coin()).into()]).into();
    assert!(has_deferred(&expr));
    // Choice -> join -> ("a ", Choice -> article -> Choice -> (heads, tails))
    assert_eq!(node_count(&expr), 8);
    assert_eq!(depth(&expr), 6);

    let dot = GraphVisualizer::to_dot(&expr);
    assert!(dot.contains("\"join\""));
    assert!(dot.contains("\"article\""));
}

#[test]
fn test_sampling_from_several_threads() {
    // Checks thread safety, not parallel sampling: one expression is shared across
    // threads and each thread draws from its own seeded sampler.
    let shared = Arc::new(Value::from(
        add(Choice::flat([1, 2]).unwrap(), Choice::flat([10, 20]).unwrap()),
    ));

    let handles: Vec<_> = (0..4u64)
        .map(|seed| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || Sampler::seeded(seed).take_samples(&shared, 100))
        })
        .collect();

    for (seed, handle) in (0..4u64).zip(handles) {
        let samples = handle.join().unwrap().unwrap();
        assert_eq!(samples.len(), 100);
        for sample in &samples {
            let n = sample.as_int().unwrap();
            assert!([11, 21, 12, 22].contains(&n), "unexpected {n}");
        }
        // each thread reproduces its own single-threaded run
        let replay = Sampler::seeded(seed).take_samples(&shared, 100).unwrap();
        assert_eq!(samples, replay);
    }
}
