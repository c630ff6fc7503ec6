use pitune_config::{Acting, load_toml};
use rstest::rstest;

#[test]
fn empty_config_uses_defaults() {
    let cfg = load_toml("").expect("parse TOML");
    cfg.validate().expect("defaults should pass");
    assert_eq!(cfg.controller.kp, 1.0);
    assert_eq!(cfg.controller.ilimit, 100.0);
    assert_eq!(cfg.controller.acting, Acting::Reverse);
    assert!(cfg.advisor.trace_imax.is_infinite());
}

#[test]
fn full_config_parses() {
    let toml = r#"
[controller]
kp = 2.5
ki = 0.25
imax = 12.0
istartup = 5.0
ilimit = 40.0
acting = "direct"

[advisor]
trace_ilimit = 80.0
trace_imax = inf

[log_format]
time_formats = ["%d.%m.%Y %H:%M"]

[logging]
file = "pitune.log"
level = "debug"
rotation = "daily"

[[presets]]
name = "Boiler Loop"
kp = 2.0
ki = 0.2
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.controller.acting, Acting::Direct);
    assert_eq!(cfg.controller.istartup, 5.0);
    assert_eq!(cfg.log_format.time_formats, vec!["%d.%m.%Y %H:%M".to_string()]);
    let boiler = cfg.preset("boiler loop").expect("user preset");
    assert_eq!(boiler.ilimit, 100.0);
    assert_eq!(boiler.acting, Acting::Reverse);
}

#[rstest]
#[case("[controller]\nilimit = -1.0", "controller.ilimit must be >= 0")]
#[case("[controller]\nimax = -0.5", "controller.imax must be >= 0")]
#[case("[controller]\nimax = nan", "controller.imax must be >= 0")]
#[case("[controller]\nkp = inf", "controller.kp must be finite")]
#[case("[advisor]\ntrace_ilimit = inf", "advisor.trace_ilimit must be finite")]
#[case("[log_format]\ntime_formats = []", "at least one format")]
#[case("[logging]\nrotation = \"weekly\"", "logging.rotation must be one of")]
#[case(
    "[[presets]]\nname = \"Bad\"\nkp = 1.0\nki = 0.1\nilimit = -3.0",
    "presets[0] (Bad).ilimit must be >= 0"
)]
#[case("[[presets]]\nname = \" \"\nkp = 1.0\nki = 0.1", "presets[0].name must not be empty")]
fn rejects_invalid_values(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(format!("{err}").contains(needle), "got: {err}");
}

#[test]
fn unknown_acting_is_a_parse_error() {
    let err = load_toml("[controller]\nacting = \"sideways\"").expect_err("should not parse");
    assert!(format!("{err}").contains("sideways"));
}
