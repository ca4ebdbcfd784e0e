//! Unit tests for epi-report.

#[cfg(test)]
const PARAMS_JSON: &str = r#"{
    "time0": 0, "time1": 4, "time_step": 0.5, "report_every": 2,
    "populations": [
        {
            "name": "north", "group_names": ["young", "old"],
            "size": [100, 50],
            "matrices": [[[1, 0], [0, 1]]],
            "u": [0.1, 0.1], "y": [0.5, 0.5],
            "fIp": [1, 1], "fIa": [0.5, 0.5], "fIs": [1, 1],
            "dE": {"fixed": {"delay": 1}}, "dIp": {"fixed": {"delay": 1}},
            "dIa": {"fixed": {"delay": 1}}, "dIs": {"fixed": {"delay": 1}},
            "dH": {"fixed": {"delay": 1}}, "dC": {"fixed": {"delay": 0}}
        },
        {
            "size": [10, 20],
            "matrices": [[[1, 0], [0, 1]]],
            "u": [0.1, 0.1], "y": [0.5, 0.5],
            "fIp": [1, 1], "fIa": [0.5, 0.5], "fIs": [1, 1],
            "dE": {"fixed": {"delay": 1}}, "dIp": {"fixed": {"delay": 1}},
            "dIa": {"fixed": {"delay": 1}}, "dIs": {"fixed": {"delay": 1}},
            "dH": {"fixed": {"delay": 1}}, "dC": {"fixed": {"delay": 0}}
        }
    ],
    "processes": [
        {"name": "severe", "source": "Ip", "names": ["hosp", "icu"],
         "prob": [[0.1, 0.2], [0.05, 0.1]],
         "delays": [{"fixed": {"delay": 3}}, {"fixed": {"delay": 5}}],
         "report": ["pi", "o"]},
        {"name": "quiet", "source": "S", "names": ["untracked"],
         "prob": [[0.0, 0.0]], "delays": [{"fixed": {"delay": 1}}], "report": [""]}
    ]
}"#;

#[cfg(test)]
fn build(json: &str) -> crate::ReportResult<crate::Reporter> {
    use epi_config::{Parameters, ProcessPlan};

    let params = Parameters::from_json_str(json).unwrap();
    let plan = ProcessPlan::resolve(&params.processes, params.n_groups(), params.time_step).unwrap();
    crate::Reporter::new(&params, &plan)
}

#[cfg(test)]
mod channel {
    use epi_core::{ChannelId, ProcessCompartmentId};

    use crate::{BuiltinChannel, ReportKind};

    use super::{PARAMS_JSON, build};

    #[test]
    fn builtin_ids_are_dense() {
        for (i, ch) in BuiltinChannel::ALL.iter().enumerate() {
            assert_eq!(ch.id(), ChannelId(i as u32));
        }
        assert_eq!(BuiltinChannel::Cases.kind(), ReportKind::Incidence);
        assert_eq!(BuiltinChannel::R.kind(), ReportKind::Prevalence);
    }

    #[test]
    fn tags_parse() {
        assert_eq!(ReportKind::from_tag('p'), Some(ReportKind::Prevalence));
        assert_eq!(ReportKind::from_tag('o'), Some(ReportKind::Outcidence));
        assert_eq!(ReportKind::from_tag('x'), None);
        assert_eq!(ReportKind::Incidence.tag(), 'i');
    }

    #[test]
    fn process_channels_follow_declaration_order() {
        let r = build(PARAMS_JSON).unwrap();
        let layout = r.layout();
        assert_eq!(
            layout.names(),
            &["S", "E", "Ip", "Is", "Ia", "R", "cases", "cases_reported", "subclinical", "hosp_p", "hosp_i", "icu_o"]
        );
        assert_eq!(layout.prevalence()[0].channel, ChannelId(9));
        assert_eq!(layout.incidence()[0].channel, ChannelId(10));
        assert_eq!(layout.outcidence()[0].channel, ChannelId(11));
        assert_eq!(layout.outcidence()[0].compartment, ProcessCompartmentId(1));
        assert_eq!(layout.kind(ChannelId(11)), ReportKind::Outcidence);
        assert_eq!(layout.find("hosp_i"), Some(ChannelId(10)));
        assert_eq!(layout.find("untracked_p"), None);
    }
}

#[cfg(test)]
mod reporter {
    use epi_core::{ChannelId, GroupId, PopulationId};

    use crate::{BuiltinChannel, ReportError};

    use super::{PARAMS_JSON, build};

    #[test]
    fn sized_from_configuration() {
        let r = build(PARAMS_JSON).unwrap();
        assert_eq!(r.n_rows(), 5);
        assert_eq!(r.n_populations(), 2);
        assert_eq!(r.n_groups(), 2);
        assert_eq!(r.column(ChannelId(0)).len(), 5 * 2 * 2);
        assert_eq!(r.population_name(PopulationId(0)), "north");
        assert_eq!(r.population_name(PopulationId(1)), "1");
        assert_eq!(r.group_name(GroupId(1)), "old");
        assert_eq!(r.row_time(4), 4.0);
        assert_eq!(r.stopped_at(), None);
    }

    #[test]
    fn set_overwrites_add_accumulates() {
        let mut r = build(PARAMS_JSON).unwrap();
        let (p, a) = (PopulationId(1), GroupId(0));
        let s = BuiltinChannel::S.id();
        let cases = BuiltinChannel::Cases.id();

        r.set(2, p, a, s, 7.0);
        r.set(2, p, a, s, 5.0);
        r.add(2, p, a, cases, 1.0);
        r.add(2, p, a, cases, 2.0);

        assert_eq!(r.get(2, p, a, s), 5.0);
        assert_eq!(r.get(2, p, a, cases), 3.0);
        assert_eq!(r.get(2, PopulationId(0), a, cases), 0.0);
        assert_eq!(r.series(p, a, cases), vec![0.0, 0.0, 3.0, 0.0, 0.0]);
        assert_eq!(r.row_total(2, cases), 3.0);
        assert_eq!(r.column_by_name("cases").map(|c| c.iter().sum::<f64>()), Some(3.0));
    }

    #[test]
    fn records_early_stop() {
        let mut r = build(PARAMS_JSON).unwrap();
        r.mark_stopped(2.5);
        assert_eq!(r.stopped_at(), Some(2.5));
    }

    #[test]
    fn misaligned_step_rejected() {
        let json = PARAMS_JSON.replace(r#""time_step": 0.5"#, r#""time_step": 0.25"#);
        assert!(matches!(
            build(&json),
            Err(ReportError::StepMismatch { report_every: 2, .. })
        ));
    }

    #[test]
    fn unknown_report_tag_rejected() {
        let json = PARAMS_JSON.replace(r#""report": ["pi", "o"]"#, r#""report": ["pi", "ox"]"#);
        match build(&json) {
            Err(ReportError::UnknownReportKind { compartment, tag }) => {
                assert_eq!(compartment, "icu");
                assert_eq!(tag, 'x');
            }
            other => panic!("expected UnknownReportKind, got {other:?}"),
        }
    }
}

#[cfg(test)]
mod csv_writer {
    use std::io::Read;

    use epi_core::{GroupId, PopulationId};

    use crate::{BuiltinChannel, CsvWriter, OutputWriter, ReportError};

    use super::{PARAMS_JSON, build};

    #[test]
    fn writes_header_and_long_rows() {
        let mut r = build(PARAMS_JSON).unwrap();
        r.set(1, PopulationId(0), GroupId(1), BuiltinChannel::S.id(), 42.0);

        let mut w = CsvWriter::from_writer(Vec::new());
        w.write_reporter(3, &r).unwrap();
        let text = String::from_utf8(w.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "run,t,population,group,S,E,Ip,Is,Ia,R,cases,cases_reported,subclinical,hosp_p,hosp_i,icu_o"
        );
        // 5 rows × 2 populations × 2 groups
        assert_eq!(lines.len(), 1 + 20);
        assert!(lines[1].starts_with("3,0,north,young,0,"));
        // row 1, population 0, group 1 is the 6th data record
        assert!(lines[6].starts_with("3,1,north,old,42,"));
    }

    #[test]
    fn replicates_share_one_header() {
        let r = build(PARAMS_JSON).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut w = CsvWriter::create(&path).unwrap();
        w.write_reporter(0, &r).unwrap();
        w.write_reporter(1, &r).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
        drop(w);

        let mut text = String::new();
        std::fs::File::open(&path).unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text.lines().filter(|l| l.starts_with("run,")).count(), 1);
        assert_eq!(text.lines().count(), 1 + 2 * 20);
    }

    #[test]
    fn layout_change_rejected() {
        let a = build(PARAMS_JSON).unwrap();
        let json = PARAMS_JSON.replace(r#""report": ["pi", "o"]"#, r#""report": ["pi", ""]"#);
        let b = build(&json).unwrap();

        let mut w = CsvWriter::from_writer(Vec::new());
        w.write_reporter(0, &a).unwrap();
        assert!(matches!(w.write_reporter(1, &b), Err(ReportError::LayoutMismatch { .. })));
    }
}
