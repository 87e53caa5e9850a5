//! Configuration layering as seen by callers

use texier::texier::config::Balancing;
use texier::texier::{Loader, ProcessingError, Processor};

#[test]
fn test_missing_required_file_is_an_error() {
    let result = Loader::new()
        .with_file("does/not/exist/texier.toml")
        .build();
    assert!(result.is_err());
}

#[test]
fn test_missing_optional_file_is_ignored() {
    let config = Loader::new()
        .with_optional_file("does/not/exist/texier.toml")
        .build()
        .expect("defaults still load");
    assert_eq!(config.heading.balancing, Balancing::Dynamic);
}

#[test]
fn test_later_layers_win() {
    let config = Loader::new()
        .with_toml("[heading]\ntop = 2\n")
        .with_toml("[heading]\ntop = 4\n")
        .build()
        .expect("config");
    assert_eq!(config.heading.top, 4);
}

#[test]
fn test_custom_bullet_table() {
    let config = Loader::new()
        .with_toml("[[list.bullets]]\npattern = '~[ \\t]+'\nordered = false\n")
        .build()
        .expect("config");
    assert_eq!(config.list.bullets.len(), 1);

    let processor = Processor::new(&config).expect("processor");
    assert_eq!(processor.to_html("~ a\n~ b"), "<ul><li>a</li><li>b</li></ul>");
    // the default bullets are gone
    assert_eq!(processor.to_html("- a"), "<p>- a</p>");
}

#[test]
fn test_invalid_bullet_pattern_is_reported() {
    let config = Loader::new()
        .with_toml("[[list.bullets]]\npattern = '(['\nordered = false\n")
        .build()
        .expect("config");
    assert!(matches!(
        Processor::new(&config),
        Err(ProcessingError::Grammar(_))
    ));
}

#[test]
fn test_processors_with_different_configs_coexist() {
    let plain = Processor::with_defaults().expect("processor");
    let fixed = Processor::new(
        &Loader::new()
            .with_toml("[heading]\nbalancing = \"fixed\"\n")
            .build()
            .expect("config"),
    )
    .expect("processor");

    assert_eq!(plain.to_html("#### x"), "<h1>x</h1>");
    assert_eq!(fixed.to_html("#### x"), "<h4>x</h4>");
}
