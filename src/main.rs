use color_eyre::Report;
use content_components::config::{Flags, Output};
use content_components::dom::DomNode;
use content_components::EditorSpecs;
use log::*;
use structopt::StructOpt;

fn print_html(specs: &EditorSpecs) {
    for (name, spec) in &specs.nodes {
        let node = spec.create(None);
        let content = if spec.has_content() {
            vec![DomNode::Text(format!("{} content", spec.view.label))]
        } else {
            Vec::new()
        };
        debug!("Rendering node {}", name);
        println!("{}", spec.to_dom(&node).to_element(content));
    }
    for (name, spec) in &specs.marks {
        let mut element = spec.to_dom(&spec.create());
        element.children.push(DomNode::Text(name.clone()));
        println!("{}", element);
    }
}

#[tokio::main]
async fn main() -> Result<(), Report> {
    if std::env::var(env_logger::DEFAULT_FILTER_ENV).is_err() {
        std::env::set_var(
            env_logger::DEFAULT_FILTER_ENV,
            #[cfg(debug_assertions)]
            "warn,content_components=trace",
            #[cfg(not(debug_assertions))]
            "warn,content_components=info",
        );
    }
    env_logger::init();
    color_eyre::install()?;

    let flags = Flags::from_args();
    let setup = flags.load_cfg().await?;

    let specs = content_components::build(&setup.components);
    info!(
        "Built {} node specs and {} mark specs",
        specs.nodes.len(),
        specs.marks.len()
    );

    match setup.output {
        Output::Specs { pretty } => {
            let json = if pretty {
                serde_json::to_string_pretty(&specs)?
            } else {
                serde_json::to_string(&specs)?
            };
            println!("{}", json);
        }
        Output::Html => print_html(&specs),
    }
    Ok(())
}
