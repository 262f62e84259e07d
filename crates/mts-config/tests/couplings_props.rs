use mts_config::{CouplingSet, CouplingTriple};
use proptest::prelude::*;

fn render(values: [f64; 3]) -> String {
    format!("{:e},{:e},{:e}", values[0], values[1], values[2])
}

fn triple() -> impl Strategy<Value = [f64; 3]> {
    [1e-12f64..1.0, 1e-12f64..1.0, 1e-12f64..1.0]
}

#[test]
fn non_finite_couplings_are_malformed() {
    for raw in ["nan,1e-9,1e-9", "1e-9,inf,1e-9", "1e-9,1e-9,-infinity"] {
        let err = CouplingTriple::parse(raw).unwrap_err();
        assert_eq!(err.info().code, "mts_config.malformed_couplings");
        let err = CouplingSet::resolve(raw, None, None).unwrap_err();
        assert_eq!(err.info().code, "mts_config.malformed_couplings");
    }
}

proptest! {
    #[test]
    fn shared_triple_is_used_for_both(values in triple()) {
        let set = CouplingSet::resolve(&render(values), None, None).unwrap();
        prop_assert_eq!(set.production(), set.decay());
        prop_assert_eq!(set.production(), CouplingTriple(values));
    }

    #[test]
    fn split_triples_are_kept(prod in triple(), dec in triple(), combined in triple()) {
        let set = CouplingSet::resolve(
            &render(combined),
            Some(&render(prod)),
            Some(&render(dec)),
        )
        .unwrap();
        prop_assert_eq!(set.production(), CouplingTriple(prod));
        prop_assert_eq!(set.decay(), CouplingTriple(dec));
    }

    #[test]
    fn partial_specification_fails(values in triple(), production_only in any::<bool>()) {
        let rendered = render(values);
        let (production, decay) = if production_only {
            (Some(rendered.as_str()), None)
        } else {
            (None, Some(rendered.as_str()))
        };
        let err = CouplingSet::resolve("1,2,3", production, decay).unwrap_err();
        prop_assert_eq!(err.info().code.as_str(), "mts_config.partial_couplings");
    }
}
