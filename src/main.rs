use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tabzoom_config::TabzoomConfig;
use tabzoom_shell::Shell;
use tabzoom_transition::{
    OverlayGeometry, Participant, Point, PointerEvent, TransitionEvent, TransitionPhase,
};

mod render;

const FRAME_MS: f32 = 1000.0 / 60.0;
const MAX_SETTLE_FRAMES: u32 = 600;

struct Options {
    config: Option<PathBuf>,
    tabs: usize,
    open: usize,
    frames_dir: Option<PathBuf>,
    json: bool,
    swipe_distance: f32,
}

impl Options {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut options = Options {
            config: None,
            tabs: 4,
            open: 1,
            frames_dir: None,
            json: false,
            swipe_distance: 320.0,
        };

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .with_context(|| format!("{flag} expects a value"))
            };
            match arg.as_str() {
                "--config" => options.config = Some(PathBuf::from(value("--config")?)),
                "--tabs" => options.tabs = value("--tabs")?.parse().context("--tabs")?,
                "--open" => options.open = value("--open")?.parse().context("--open")?,
                "--frames" => options.frames_dir = Some(PathBuf::from(value("--frames")?)),
                "--swipe" => {
                    options.swipe_distance = value("--swipe")?.parse().context("--swipe")?
                }
                "--json" => options.json = true,
                "--help" | "-h" => {
                    eprintln!(
                        "Usage: tabzoom [--config <file>] [--tabs <n>] [--open <index>] \
                         [--swipe <px>] [--frames <dir>] [--json]"
                    );
                    std::process::exit(0);
                }
                other => bail!("unknown argument: {other}"),
            }
        }

        if options.tabs == 0 {
            bail!("--tabs must be at least 1");
        }
        Ok(options)
    }
}

#[derive(Serialize)]
struct FrameRecord {
    frame: u32,
    phase: TransitionPhase,
    overlay: Option<OverlayGeometry>,
    outgoing_alpha: f32,
    incoming_alpha: f32,
}

struct Driver {
    shell: Shell,
    options: Options,
    frame: u32,
}

impl Driver {
    fn record(&mut self) -> Result<()> {
        let coordinator = self.shell.coordinator();
        let record = FrameRecord {
            frame: self.frame,
            phase: coordinator.phase(),
            overlay: coordinator.overlay().map(|o| o.geometry),
            outgoing_alpha: coordinator.view_alpha(Participant::Outgoing),
            incoming_alpha: coordinator.view_alpha(Participant::Incoming),
        };
        if self.options.json {
            println!("{}", serde_json::to_string(&record)?);
        } else if let Some(overlay) = record.overlay {
            log::trace!(
                "frame {:4} {:?} frame={:?} radius={:.1}",
                record.frame,
                record.phase,
                overlay.frame,
                overlay.corner_radius
            );
        }

        if let Some(dir) = &self.options.frames_dir {
            let path = dir.join(format!("frame_{:04}.png", self.frame));
            render::compose(&self.shell)
                .save(&path)
                .with_context(|| format!("writing {}", path.display()))?;
        }
        self.frame += 1;
        Ok(())
    }

    fn step(&mut self) -> Result<bool> {
        let running = self.shell.tick(FRAME_MS);
        self.record()?;
        self.report_events();
        Ok(running)
    }

    fn settle(&mut self) -> Result<()> {
        for _ in 0..MAX_SETTLE_FRAMES {
            if !self.step()? {
                return Ok(());
            }
        }
        bail!("transition did not settle within {MAX_SETTLE_FRAMES} frames")
    }

    fn pointer(&mut self, event: PointerEvent) {
        self.shell.handle_pointer(event);
        self.report_events();
    }

    fn report_events(&mut self) {
        for event in self.shell.take_events() {
            match event {
                TransitionEvent::InteractiveProgress { percent, .. } => {
                    log::debug!("interactive progress {:.0}%", percent * 100.0)
                }
                other => log::info!("{other:?}"),
            }
        }
    }

    /// Swipe up from the bottom edge, one pointer sample per frame.
    fn swipe_up(&mut self) -> Result<()> {
        let h = self.shell.screen_size().h;
        let x = self.shell.screen_size().w / 2.0;
        let start_y = h - 20.0;
        let steps = 12;
        let mut time_ms = 0.0;

        self.pointer(PointerEvent::Down {
            position: Point::new(x, start_y),
            time_ms,
        });
        for i in 1..=steps {
            time_ms += f64::from(FRAME_MS);
            let y = start_y - self.options.swipe_distance * i as f32 / steps as f32;
            self.pointer(PointerEvent::Move {
                position: Point::new(x, y),
                time_ms,
            });
            self.step()?;
        }
        self.pointer(PointerEvent::Up {
            position: Point::new(x, start_y - self.options.swipe_distance),
            time_ms: time_ms + f64::from(FRAME_MS),
        });
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let options = Options::parse(env::args().skip(1))?;
    let config = match &options.config {
        Some(path) => {
            let mut config = TabzoomConfig::load_from_file(path)?;
            config.merge_with_env();
            config
        }
        None => TabzoomConfig::load(),
    };
    if let Some(dir) = &options.frames_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }

    let mut shell = Shell::new(&config, render::BandRenderer)?;
    for _ in 0..options.tabs {
        shell.add_tab();
    }
    let open = options.open.min(options.tabs - 1);

    let mut driver = Driver {
        shell,
        options,
        frame: 0,
    };

    log::info!("opening tab {open}");
    driver.shell.open_tab(open)?;
    driver.record()?;
    driver.settle()?;

    log::info!("swiping to dismiss");
    driver.swipe_up()?;
    driver.settle()?;

    log::info!(
        "done after {} frames; showing {:?}",
        driver.frame,
        driver.shell.visible_screen()
    );
    Ok(())
}
