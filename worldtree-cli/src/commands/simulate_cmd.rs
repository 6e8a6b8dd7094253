use std::io::Write;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::project::LoadedConfig;
use crate::script::{FrameRecord, Replay, Script};

pub fn run(
    script_path: &Path,
    format: OutputFormat,
    every: u32,
    loaded: LoadedConfig,
) -> anyhow::Result<()> {
    let script = Script::load(script_path)?;
    log::info!(
        "Replaying {} ({} frames at {} fps), config from {}",
        script_path.display(),
        script.total_frames(),
        script.fps,
        loaded.source
    );

    let every = u64::from(every.max(1));
    let mut records = Vec::new();
    let mut replay = Replay::new(loaded.config, &script);
    replay.run(&script, |record| {
        if record.frame % every == 0 {
            records.push(*record);
        }
    });

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Table => write_table(&mut out, &records)?,
        OutputFormat::Json => {
            for record in &records {
                writeln!(out, "{}", serde_json::to_string(record)?)?;
            }
        }
    }

    let end = replay.camera().position;
    log::info!("Final position ({:.3}, {:.3}, {:.3})", end.x, end.y, end.z);
    Ok(())
}

fn write_table(out: &mut impl Write, records: &[FrameRecord]) -> std::io::Result<()> {
    writeln!(
        out,
        "{:>6} {:>9} {:>8} {:>8} {:>8} {:>7} {:>7} {:>7}  look",
        "frame", "t_ms", "x", "y", "z", "speed", "yaw°", "pitch°"
    )?;
    for r in records {
        writeln!(
            out,
            "{:>6} {:>9.1} {:>8.3} {:>8.3} {:>8.3} {:>7.3} {:>7.2} {:>7.2}  {}",
            r.frame,
            r.time_ms,
            r.position.x,
            r.position.y,
            r.position.z,
            r.velocity.length(),
            r.yaw.to_degrees(),
            r.pitch.to_degrees(),
            if r.mouse_active { "on" } else { "off" }
        )?;
    }
    Ok(())
}
