use cloudkeep::CloudkeepError;
use cloudkeep::config::{OutputFormat, Settings};
use cloudkeep::report::{Section, build, write_report};

fn render(settings: &Settings) -> String {
    let mut out = Vec::new();
    write_report(&mut out, settings).expect("report written");
    String::from_utf8(out).expect("utf-8 output")
}

#[test]
fn text_report_lists_attached_volumes_per_running_instance() {
    let text = render(&Settings::default());
    let expected = "\nAll volumes attached to running instances\n\
        Instance(id : 1100 , name : micro , state : running , region : oregon)\n\
        \tVolume(id : 2200 , name : data1 , state : in-use , region : ohio , \
        attached_instance_id : 1100)\n\
        Instance(id : 1400 , name : large1 , state : running , region : oregon)\n\
        \tNo attached volumes\n";
    assert!(text.contains(expected), "unexpected report:\n{text}");
}

#[test]
fn text_report_prints_empty_sections_as_bare_titles() {
    let text = render(&Settings::default());
    assert!(text.contains("\nempty list print nothing\n\navailable volumes list\n"));
    assert!(text.starts_with("\nall created instance objects\nInstance(id : 1100"));
}

#[test]
fn json_report_is_one_array_per_section() {
    let settings = Settings {
        format: OutputFormat::Json,
        ..Settings::default()
    };
    let json = render(&settings);
    let lines: Vec<&str> = json.lines().collect();
    assert_eq!(lines.len(), 24, "a title line and an array line per section");
    assert_eq!(lines[0], "all created instance objects");
    for pair in lines.chunks(2) {
        let value: serde_json::Value = serde_json::from_str(pair[1]).expect("valid json");
        assert!(value.is_array(), "section {} holds an array", pair[0]);
    }
    let instances: serde_json::Value = serde_json::from_str(lines[1]).expect("valid json");
    assert_eq!(instances[0]["kind"], "instance");
    assert_eq!(instances[0]["attributes"]["id"], "1100");

    let attached: serde_json::Value = serde_json::from_str(lines[19]).expect("valid json");
    assert_eq!(lines[18], "All volumes attached to running instances");
    assert_eq!(attached[0]["parent"]["attributes"]["id"], "1100");
    assert_eq!(attached[0]["related"][0]["attributes"]["id"], "2200");
    assert_eq!(attached[1]["related"], serde_json::json!([]));
}

#[test]
fn walkthrough_excludes_terminated_instances() {
    let sections = build(&Settings::default()).expect("lenient build");
    assert_eq!(sections.len(), 12);
    match sections.last() {
        Some(Section::Entities { title, entities }) => {
            assert_eq!(*title, "All NOT terminated instances");
            let ids: Vec<&str> = entities.iter().filter_map(|e| e.get("id")).collect();
            assert_eq!(ids, vec!["1100", "1300", "1400"]);
        }
        other => panic!("unexpected last section: {other:?}"),
    }
}

#[test]
fn strict_report_fails_on_malformed_field_and_writes_nothing() {
    let settings = Settings {
        strict: true,
        volumes: "id:2100,broken".to_string(),
        ..Settings::default()
    };
    let mut out = Vec::new();
    match write_report(&mut out, &settings) {
        Err(CloudkeepError::MalformedField { record, field }) => {
            assert_eq!(record, "id:2100,broken");
            assert_eq!(field, "broken");
        }
        other => panic!("expected a malformed field, got {other:?}"),
    }
    assert!(out.is_empty(), "nothing written before the failure");

    let lenient = Settings {
        strict: false,
        ..settings
    };
    let text = render(&lenient);
    assert!(text.contains("\nall created volume objects\nVolume(id : 2100)\n"));
}
