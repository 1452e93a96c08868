use widget_factory::config::Config;
mod common;

#[ctor::ctor]
fn _init() {
    common::init();
}

#[test]
fn config_defaults() {
    let c = Config::new();
    assert_eq!(c.model, "gpt-4o-mini");
    assert_eq!(c.max_tokens, 2000);
}
