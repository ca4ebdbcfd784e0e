//! Unit tests for epi-config.

#[cfg(test)]
const TWO_GROUP_JSON: &str = r#"{
    "time0": 0, "time1": 10, "time_step": 1, "report_every": 1,
    "deterministic": true,
    "populations": [{
        "name": "town",
        "size": [100, 200],
        "matrices": [[[1.0, 0.5], [0.5, 1.0]], [[2.0, 0.0], [0.0, 2.0]]],
        "u": [0.1, 0.2], "y": [0.5, 0.5],
        "fIp": [1, 1], "fIa": [0.5, 0.5], "fIs": [1, 1],
        "dE":  {"fixed": {"delay": 2}},
        "dIp": {"fixed": {"delay": 1}},
        "dIa": {"weights": [0, 1, 1]},
        "dIs": {"gamma": {"mean": 3.0, "shape": 3.0, "max": 20}},
        "dH":  {"lognormal": {"mean": 4.0, "sd": 1.0, "max": 20}},
        "dC":  {"fixed": {"delay": 0}},
        "seed_events": [{"t": 0, "n": 5}, {"t": 2}],
        "schedule": [{"t": 3, "variable": "contact", "value": [0.5, 0.0]}]
    }]
}"#;

#[cfg(test)]
mod params {
    use crate::{ConfigError, Parameters, ScheduledVariable};

    use super::TWO_GROUP_JSON;

    #[test]
    fn parses_and_validates() {
        let p = Parameters::from_json_str(TWO_GROUP_JSON).unwrap();
        assert_eq!(p.n_groups(), 2);
        assert!(p.mode().is_deterministic());
        assert_eq!(p.populations[0].seed_events[1].n, 1.0, "n defaults to one");
        assert_eq!(p.populations[0].schedule[0].variable, ScheduledVariable::Contact);
        assert_eq!(p.populations[0].group_name(1), "1");
    }

    #[test]
    fn travel_defaults_to_identity() {
        let p = Parameters::from_json_str(TWO_GROUP_JSON).unwrap();
        assert_eq!(p.travel(0, 0), 1.0);
        assert!(p.travel.is_none());
    }

    #[test]
    fn wrong_vector_length_rejected() {
        let json = TWO_GROUP_JSON.replace(r#""u": [0.1, 0.2]"#, r#""u": [0.1]"#);
        let err = Parameters::from_json_str(&json).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "populations[0].u"));
    }

    #[test]
    fn non_square_contact_matrix_rejected() {
        let json = TWO_GROUP_JSON.replace("[[2.0, 0.0], [0.0, 2.0]]", "[[2.0, 0.0, 1.0], [0.0, 2.0, 1.0]]");
        assert!(Parameters::from_json_str(&json).is_err());
    }

    #[test]
    fn ragged_matrix_is_a_parse_error() {
        let json = TWO_GROUP_JSON.replace("[[2.0, 0.0], [0.0, 2.0]]", "[[2.0, 0.0], [0.0]]");
        assert!(matches!(Parameters::from_json_str(&json), Err(ConfigError::Json(_))));
    }

    #[test]
    fn clinical_fraction_must_be_probability() {
        let json = TWO_GROUP_JSON.replace(r#""y": [0.5, 0.5]"#, r#""y": [0.5, 1.5]"#);
        assert!(Parameters::from_json_str(&json).is_err());
    }

    #[test]
    fn unordered_seeds_rejected() {
        let json = TWO_GROUP_JSON.replace(r#"[{"t": 0, "n": 5}, {"t": 2}]"#, r#"[{"t": 2}, {"t": 0, "n": 5}]"#);
        let err = Parameters::from_json_str(&json).unwrap_err();
        assert!(err.to_string().contains("seed_events"));
    }

    #[test]
    fn seed_times_merge_into_events() {
        let json = TWO_GROUP_JSON.replace(
            r#""seed_events": [{"t": 0, "n": 5}, {"t": 2}]"#,
            r#""seed_events": [{"t": 0, "n": 5}, {"t": 2}], "seed_times": [1, 2, 4]"#,
        );
        let p = Parameters::from_json_str(&json).unwrap();
        let merged: Vec<(f64, f64)> = p.populations[0].seed_schedule().iter().map(|e| (e.t, e.n)).collect();
        assert_eq!(merged, vec![(0.0, 5.0), (1.0, 1.0), (2.0, 1.0), (2.0, 1.0), (4.0, 1.0)]);

        let unordered = TWO_GROUP_JSON.replace(
            r#""seed_events": [{"t": 0, "n": 5}, {"t": 2}]"#,
            r#""seed_times": [3, 1]"#,
        );
        let err = Parameters::from_json_str(&unordered).unwrap_err();
        assert!(err.to_string().contains("seed_times"));
    }

    #[test]
    fn schedule_value_length_checked() {
        let json = TWO_GROUP_JSON.replace(r#""value": [0.5, 0.0]"#, r#""value": [0.5]"#);
        assert!(Parameters::from_json_str(&json).is_err());
    }

    #[test]
    fn scheduled_probabilities_checked() {
        let schedule = |variable: &str, value: &str| {
            TWO_GROUP_JSON.replace(
                r#"{"t": 3, "variable": "contact", "value": [0.5, 0.0]}"#,
                &format!(r#"{{"t": 3, "variable": "{variable}", "value": {value}}}"#),
            )
        };
        for variable in ["rho", "y"] {
            let err = Parameters::from_json_str(&schedule(variable, "[0.5, 1.5]")).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { ref field, .. } if field == "populations[0].schedule[0].value"),
                "{variable}: {err}"
            );
            assert!(Parameters::from_json_str(&schedule(variable, "[0.2, 1.0]")).is_ok());
        }
        // Other variables are rates, not probabilities.
        assert!(Parameters::from_json_str(&schedule("u", "[0.5, 1.5]")).is_ok());
    }

    #[test]
    fn zero_seed_ages_rejected() {
        let json = TWO_GROUP_JSON.replace(r#""seed_events""#, r#""seed_ages": [0, 0], "seed_events""#);
        let err = Parameters::from_json_str(&json).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "populations[0].seed_ages"));

        let json = TWO_GROUP_JSON.replace(r#""seed_events""#, r#""seed_ages": [0, 2], "seed_events""#);
        assert!(Parameters::from_json_str(&json).is_ok());
    }

    #[test]
    fn travel_shape_checked() {
        let json = TWO_GROUP_JSON.replace(r#""deterministic": true,"#, r#""deterministic": true, "travel": [[1, 0], [0, 1]],"#);
        let err = Parameters::from_json_str(&json).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "travel"));
    }

    #[test]
    fn time_horizon_checked() {
        let json = TWO_GROUP_JSON.replace(r#""time1": 10"#, r#""time1": -1"#);
        assert!(Parameters::from_json_str(&json).is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("params.json");
        std::fs::write(&path, TWO_GROUP_JSON).unwrap();
        let p = Parameters::from_json_path(&path).unwrap();
        assert_eq!(p.populations[0].name, "town");

        let missing = Parameters::from_json_path(&dir.path().join("nope.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}

#[cfg(test)]
mod rates {
    use approx::assert_abs_diff_eq;

    use crate::{Parameters, PopulationRates};

    use super::TWO_GROUP_JSON;

    fn rates() -> PopulationRates {
        let p = Parameters::from_json_str(TWO_GROUP_JSON).unwrap();
        PopulationRates::new(&p.populations[0], p.time_step).unwrap()
    }

    #[test]
    fn defaults_filled() {
        let r = rates();
        assert_eq!(r.contact, vec![1.0, 1.0]);
        assert_eq!(r.reporting, vec![0.0, 0.0]);
        assert_eq!(r.external_mixing, vec![1.0, 1.0]);
        assert_eq!(r.seed_ages, vec![0.5, 0.5]);
    }

    #[test]
    fn contact_matrix_is_weighted_sum() {
        let r = rates();
        assert_eq!(r.contact_matrix().get(0, 0), 3.0);
        assert_eq!(r.contact_matrix().get(0, 1), 0.5);
    }

    #[test]
    fn scheduled_change_recalculates() {
        let p = Parameters::from_json_str(TWO_GROUP_JSON).unwrap();
        let mut r = PopulationRates::new(&p.populations[0], p.time_step).unwrap();
        r.set(&p.populations[0].schedule[0]);
        // Stale until recalculated.
        assert_eq!(r.contact_matrix().get(0, 0), 3.0);
        r.recalculate();
        assert_abs_diff_eq!(r.contact_matrix().get(0, 0), 0.5);
        assert_abs_diff_eq!(r.contact_matrix().get(1, 0), 0.25);
        // The shared parameters are untouched.
        assert!(p.populations[0].contact.is_empty());
    }

    #[test]
    fn delays_discretised() {
        let r = rates();
        assert_eq!(r.delays.exposed.weights(), &[0.0, 0.0, 1.0]);
        assert_eq!(r.delays.asymptomatic.weights(), &[0.0, 0.5, 0.5]);
        assert_eq!(r.delays.reporting.weights(), &[1.0]);
        assert_abs_diff_eq!(r.delays.symptomatic.mean_steps(), 3.0, epsilon = 0.1);
    }
}

#[cfg(test)]
mod delay {
    use crate::{ConfigError, DelaySpec};

    #[test]
    fn json_forms() {
        let g: DelaySpec = serde_json::from_str(r#"{"gamma": {"mean": 2, "shape": 2, "max": 10}}"#).unwrap();
        assert!(matches!(g, DelaySpec::Gamma { .. }));
        let w: DelaySpec = serde_json::from_str(r#"{"weights": [1, 2]}"#).unwrap();
        assert_eq!(w, DelaySpec::Weights(vec![1.0, 2.0]));
    }

    #[test]
    fn fixed_delay_in_model_time() {
        let d = DelaySpec::Fixed { delay: 1.0 }.resolve(0.25, "dH").unwrap();
        assert_eq!(d.len(), 5);
        assert_eq!(d.weights()[4], 1.0);
    }

    #[test]
    fn invalid_delay_names_field() {
        let err = DelaySpec::Weights(vec![]).resolve(1.0, "dE").unwrap_err();
        assert!(matches!(err, ConfigError::Delay { ref field, .. } if field == "dE"));
        assert!(DelaySpec::Fixed { delay: -1.0 }.resolve(1.0, "dH").is_err());
    }
}

#[cfg(test)]
mod process {
    use epi_core::ProcessCompartmentId;

    use crate::{BuiltinFlow, ConfigError, DelaySpec, Hookpoint, ProcessDecl, ProcessPlan};

    fn decl(source: &str, names: &[&str], prob: Vec<Vec<f64>>) -> ProcessDecl {
        ProcessDecl {
            name:   format!("from_{source}"),
            source: source.into(),
            names:  names.iter().map(|s| s.to_string()).collect(),
            prob,
            delays: names.iter().map(|_| DelaySpec::Fixed { delay: 1.0 }).collect(),
            report: names.iter().map(|_| "io".to_string()).collect(),
        }
    }

    #[test]
    fn builtin_names_roundtrip() {
        for flow in BuiltinFlow::ALL {
            assert_eq!(BuiltinFlow::from_source_name(flow.source_name()), Some(flow));
        }
        assert_eq!(BuiltinFlow::from_source_name("R"), None);
    }

    #[test]
    fn ids_assigned_in_declaration_order() {
        let decls = vec![
            decl("Is", &["hosp_critical", "hosp_other"], vec![vec![0.2], vec![0.8]]),
            decl("hosp_critical", &["death"], vec![vec![0.5]]),
        ];
        let plan = ProcessPlan::resolve(&decls, 1, 1.0).unwrap();
        assert_eq!(plan.n_compartments(), 3);
        assert_eq!(plan.find("death"), Some(ProcessCompartmentId(2)));
        assert_eq!(plan.processes()[0].source, Hookpoint::Builtin(BuiltinFlow::SymptomaticToHospital));
        assert_eq!(plan.processes()[1].source, Hookpoint::Compartment(ProcessCompartmentId(0)));
        assert_eq!(plan.processes()[1].compartments, vec![ProcessCompartmentId(2)]);
        assert_eq!(plan.compartment(ProcessCompartmentId(1)).name, "hosp_other");
    }

    #[test]
    fn forward_reference_allowed() {
        let decls = vec![
            decl("late", &["early"], vec![vec![1.0]]),
            decl("S", &["late"], vec![vec![1.0]]),
        ];
        let plan = ProcessPlan::resolve(&decls, 1, 1.0).unwrap();
        assert_eq!(plan.processes()[0].source, Hookpoint::Compartment(ProcessCompartmentId(1)));
    }

    #[test]
    fn probabilities_transposed() {
        let decls = vec![decl("E", &["a", "b"], vec![vec![0.1, 0.2], vec![0.9, 0.3]])];
        let plan = ProcessPlan::resolve(&decls, 2, 1.0).unwrap();
        assert_eq!(plan.processes()[0].prob_by_group, vec![vec![0.1, 0.9], vec![0.2, 0.3]]);
    }

    #[test]
    fn unknown_source_rejected() {
        let decls = vec![decl("nowhere", &["a"], vec![vec![1.0]])];
        let err = ProcessPlan::resolve(&decls, 1, 1.0).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSource { ref source_name, .. } if source_name == "nowhere"));
    }

    #[test]
    fn duplicate_and_reserved_names_rejected() {
        let dup = vec![decl("S", &["a"], vec![vec![1.0]]), decl("E", &["a"], vec![vec![1.0]])];
        assert!(matches!(ProcessPlan::resolve(&dup, 1, 1.0), Err(ConfigError::DuplicateCompartment(_))));

        let reserved = vec![decl("S", &["Ip"], vec![vec![1.0]])];
        assert!(matches!(ProcessPlan::resolve(&reserved, 1, 1.0), Err(ConfigError::DuplicateCompartment(_))));
    }

    #[test]
    fn probability_sums_checked() {
        let decls = vec![decl("S", &["a", "b"], vec![vec![0.7], vec![0.7]])];
        assert!(ProcessPlan::resolve(&decls, 1, 1.0).is_err());

        let short = vec![decl("S", &["a", "b"], vec![vec![0.2], vec![0.3]])];
        assert!(ProcessPlan::resolve(&short, 1, 1.0).is_ok());
    }

    #[test]
    fn shape_mismatches_rejected() {
        let mut d = decl("S", &["a", "b"], vec![vec![0.5]]);
        assert!(ProcessPlan::resolve(std::slice::from_ref(&d), 1, 1.0).is_err());

        d.prob = vec![vec![0.5], vec![0.5]];
        d.report = vec!["p".into()];
        assert!(ProcessPlan::resolve(std::slice::from_ref(&d), 1, 1.0).is_err());

        d.report.clear();
        let plan = ProcessPlan::resolve(std::slice::from_ref(&d), 1, 1.0).unwrap();
        assert_eq!(plan.compartments()[1].report, "");
    }

    #[test]
    fn prob_rows_must_cover_every_group() {
        let decls = vec![decl("S", &["a"], vec![vec![1.0]])];
        assert!(ProcessPlan::resolve(&decls, 2, 1.0).is_err());
    }

    #[test]
    fn processes_parse_from_json() {
        let json = r#"{"name": "icu", "source": "Is", "names": ["icu"], "prob": [[0.1]],
                       "delays": [{"fixed": {"delay": 7}}], "report": ["pi"]}"#;
        let d: ProcessDecl = serde_json::from_str(json).unwrap();
        assert_eq!(d.report, vec!["pi".to_string()]);
        let plan = ProcessPlan::resolve(&[d], 1, 1.0).unwrap();
        assert_eq!(plan.compartments()[0].delay.len(), 8);
    }
}
