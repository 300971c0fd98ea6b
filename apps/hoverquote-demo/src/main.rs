mod cli;
mod logging;

use clap::Parser;
use cli::Cli;
use futures::executor::LocalPool;
use hq_core::PreviewError;
use hq_core::PreviewResult;
use hq_dom::Document;
use hq_dom::Event;
use hq_dom::EventKind;
use hq_dom::EventTarget;
use hq_dom::NodeId;
use hq_net::FixtureTransport;
use hq_preview::ApiResolver;
use hq_preview::HoverDispatcher;
use hq_preview::PreviewConfig;
use hq_preview::PreviewEnv;
use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;

const BUNDLED_FIXTURES: &str = include_str!("../fixtures/board.json");

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Hoverquote startup error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> PreviewResult<()> {
    let config = load_config(cli)?;
    let transport = Rc::new(load_fixtures(cli)?);
    let resolver = Rc::new(ApiResolver::new(Rc::clone(&transport), config.routes()?));

    let mut pool = LocalPool::new();
    let document = Rc::new(RefCell::new(Document::new()));
    let link = build_page(&mut document.borrow_mut(), &config, cli)?;
    let env = PreviewEnv::new(Rc::clone(&document), resolver, pool.spawner())
        .with_attributes(config.attributes.clone());
    let dispatcher = Rc::new(HoverDispatcher::new(Rc::new(env), config.selector()?));

    let events = EventTarget::new();
    dispatcher.start(&events);

    // The dispatcher never watches mouse-out; leaving a reference is page wiring.
    let on_leave = Rc::clone(&dispatcher);
    events.add_event_listener(
        EventKind::MouseOut,
        Rc::new(move |event: &mut Event| {
            for handler in on_leave.take_handlers(event.target) {
                handler.detach();
            }
        }),
    );

    tracing::info!(selector = config.selector.as_str(), element = link, "hovering reference");
    events.dispatch_event(&mut Event::mouse_over(link));
    if cli.detach_early {
        events.dispatch_event(&mut Event::mouse_out(link));
    }
    pool.run_until_stalled();
    tracing::info!(
        requests = transport.request_count(),
        active = dispatcher.active_handlers(),
        "hover settled"
    );
    print_body(&document.borrow());

    if cli.leave {
        events.dispatch_event(&mut Event::mouse_out(link));
        print_body(&document.borrow());
    }

    dispatcher.stop(&events);
    Ok(())
}

fn load_config(cli: &Cli) -> PreviewResult<PreviewConfig> {
    let config = match &cli.config {
        Some(path) => {
            let input = std::fs::read_to_string(path).map_err(|error| {
                PreviewError::new(
                    "demo.config_unreadable",
                    format!("failed to read config `{}`: {error}", path.display()),
                )
            })?;
            PreviewConfig::from_json_str(&input)?
        }
        None => PreviewConfig::default(),
    }
    .with_env_overrides();

    config.validate()?;
    Ok(config)
}

fn load_fixtures(cli: &Cli) -> PreviewResult<FixtureTransport> {
    match &cli.fixtures {
        Some(path) => FixtureTransport::from_path(path),
        None => FixtureTransport::from_json_str(BUNDLED_FIXTURES),
    }
}

/// Appends one reference element carrying the requested attributes to the body.
fn build_page(document: &mut Document, config: &PreviewConfig, cli: &Cli) -> PreviewResult<NodeId> {
    let link = document.create_element("a");
    let names = [
        &config.attributes.board,
        &config.attributes.topic,
        &config.attributes.number,
    ];
    for (name, value) in names.into_iter().zip(cli.reference()) {
        if let Some(value) = value {
            document.set_attribute(link, name, value)?;
        }
    }

    let label = document.create_text(">>ref");
    document.append_child(link, label)?;
    let body = document.body();
    document.append_child(body, link)?;
    Ok(link)
}

fn print_body(document: &Document) {
    println!("{}", document.outer_html(document.body()));
}
