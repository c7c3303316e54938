use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tracing::{debug, info};

use iscroll_core::{
    headless::HeadlessHost, AppConfig, Clock, GeometryProbe, InputEvent, Modality, PointerInput,
    Size, Viewport,
};

/// Frame interval of the simulated host
const FRAME_MS: f64 = 16.0;

/// Give up on settling after this long
const SETTLE_LIMIT_MS: f64 = 10_000.0;

#[derive(Debug, Clone, Args)]
pub struct SimulateArgs {
    /// Viewport height in px
    #[arg(long, default_value_t = 500.0)]
    pub viewport: f64,
    /// Content height in px
    #[arg(long, default_value_t = 1200.0)]
    pub content: f64,
    /// Upward drag distance in px
    #[arg(long, default_value_t = 200.0)]
    pub distance: f64,
    /// Drag duration in ms
    #[arg(long, default_value_t = 100.0)]
    pub duration: f64,
    /// Pointer samples during the drag
    #[arg(long, default_value_t = 10)]
    pub steps: u32,
    /// Settle with frame tweens instead of host transitions
    #[arg(long)]
    pub tween: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    /// Milliseconds since the drag started
    pub t: f64,
    pub phase: &'static str,
    pub x: f64,
    pub y: f64,
    /// Position the host is showing, mid-transition included
    pub rendered_y: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub events: Vec<String>,
}

pub fn run(config: &AppConfig, args: &SimulateArgs) -> Result<()> {
    let frames = simulate(config, args)?;
    for frame in &frames {
        println!("{}", serde_json::to_string(frame)?);
    }
    if let Some(last) = frames.last() {
        info!(frames = frames.len(), y = last.y, "Simulation settled");
    }
    Ok(())
}

pub fn simulate(config: &AppConfig, args: &SimulateArgs) -> Result<Vec<Frame>> {
    let mut viewport_config = config.viewport.clone();
    if args.tween {
        viewport_config.use_transition = false;
    }

    let width = 320.0;
    let host = HeadlessHost::new(
        Size::new(width, args.viewport),
        Size::new(width, args.content),
    );
    let mut viewport = Viewport::new(host, &viewport_config)?;
    viewport.take_events();

    let t0 = 1000.0;
    viewport.host_mut().set_now(t0);

    let steps = args.steps.max(1);
    let start_y = args.distance.max(0.0) + 100.0;
    let mut frames = Vec::new();

    let mut record = |viewport: &mut Viewport<HeadlessHost>, phase: &'static str| {
        let rendered_y = viewport
            .host()
            .rendered_position()
            .map_or(viewport.y(), |p| p.y);
        frames.push(Frame {
            t: viewport.host().now() - t0,
            phase,
            x: viewport.x(),
            y: viewport.y(),
            rendered_y,
            events: viewport
                .take_events()
                .into_iter()
                .map(|event| format!("{event:?}"))
                .collect(),
        });
    };

    viewport.handle_event(InputEvent::Start(pointer(start_y)));
    record(&mut viewport, "start");

    for i in 1..=steps {
        let progress = i as f64 / steps as f64;
        viewport.host_mut().set_now(t0 + args.duration * progress);
        viewport.handle_event(InputEvent::Move(pointer(start_y - args.distance * progress)));
        record(&mut viewport, "move");
    }

    viewport.handle_event(InputEvent::End(pointer(start_y - args.distance)));
    record(&mut viewport, "end");
    debug!(y = viewport.y(), "Released");

    let limit = viewport.host().now() + SETTLE_LIMIT_MS;
    while viewport.is_busy() && viewport.host().now() < limit {
        viewport.advance(FRAME_MS);
        record(&mut viewport, "settle");
    }

    Ok(frames)
}

fn pointer(y: f64) -> PointerInput {
    PointerInput::new(Modality::Mouse, 0.0, y)
}
