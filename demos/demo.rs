use dragon_collections::{Attributes, CollectionOps, Config, ItemAccess, Scope};
use serde_json::{json, Value};

fn main() -> Result<(), dragon_collections::Error> {
    tracing_subscriber::fmt::init();

    let mut config = Config::from_source(json!({
        "app": {"name": "demo", "debug": true},
    }))?;
    config.import_folder("demos/config", "*.toml")?;

    println!(
        "App: {} (debug={})",
        config.get_or("app.name", json!("?")),
        config.get_or("app.debug", json!(false))
    );
    println!("Database URL: {}", config.get_or("database.url", json!("unset")));
    println!("Sections: {:?}", config.keys());

    let mut scope = Scope::builder()
        .with_items(&config)
        .with_plugin("describe", |scope: &mut Scope, _: &[Value]| {
            Value::from(format!("{} sections", scope.count()))
        })
        .build()?;
    println!("{}", scope.call("describe", &[])?);

    let attributes = Attributes::from_source(&config)?;
    println!("{}", attributes.to_json(true));

    Ok(())
}
