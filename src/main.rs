//! Headless runner: plays one simulated run in the terminal.
//!
//! Run with:
//!   RUST_LOG=info cargo run --bin observatory
//! The browser dashboard lives in the `studio` binary.

use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use log::info;

use observatory::view::{to_grid_view, to_progress_percent, Field};
use observatory::{run_loop, AppConfig, Engine, RunConfig, RunEvent, RunOutcome};

fn main() -> Result<()> {
    env_logger::init();

    let app = AppConfig::from_env().context("reading configuration")?;
    let seed = app.seed;

    let (tx, rx) = mpsc::channel();
    let mut config = RunConfig::new(app.settings);
    config.tick = app.tick;
    config.progress_tx = Some(tx);

    let runner = thread::spawn(move || {
        let mut engine = match seed {
            Some(seed) => Engine::seeded(seed),
            None => Engine::from_entropy(),
        };
        run_loop(&mut engine, &config)
    });

    for event in rx {
        if let RunEvent::Step { point, gpu, state } = event {
            println!(
                "step {:>4}/{:<4} loss {:.4} [{}] acc {:.4} [{}] gpu {:>5.1}%",
                point.step + 1,
                state.max_steps,
                point.loss,
                bar(to_progress_percent(Field::Loss, point.loss)),
                point.accuracy,
                bar(to_progress_percent(Field::Accuracy, point.accuracy)),
                gpu.value,
            );
        }
    }

    let outcome = runner
        .join()
        .map_err(|_| anyhow::anyhow!("simulation thread panicked"))??;

    match outcome {
        RunOutcome::Completed(matrix) => {
            println!("Training completed!");
            let grid = to_grid_view(&matrix);
            println!("        {}", grid.col_labels.map(|c| format!("P:{c:<3}")).join(" "));
            for (label, row) in grid.row_labels.iter().zip(grid.cells.iter()) {
                println!("T:{label:<5} {}", row.map(|v| format!("{v:<5}")).join(" "));
            }
        }
        RunOutcome::Stopped { steps } => info!("run stopped after {steps} steps"),
    }

    Ok(())
}

/// Twenty-cell text progress bar for a percentage.
fn bar(percent: u8) -> String {
    let filled = usize::from(percent) / 5;
    format!("{}{}", "#".repeat(filled), ".".repeat(20 - filled))
}
