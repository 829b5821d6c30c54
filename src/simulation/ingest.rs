//! Lane-file ingestion
//!
//! Each approach has a text file of pending arrivals, one per line, in the
//! form `id,arrival_timestamp,lane_name`. A vehicle always queues on the
//! lane whose file it was read from; the lane name inside the line is only
//! checked for consistency. The poller reads every file, parses what it can
//! and (by default) truncates the file so the same arrivals are not read
//! twice.

use anyhow::{bail, Context, Result};
use log::{debug, warn};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use super::types::{Arrival, LaneId, Timestamp, VehicleRecord};

/// Parse one arrival line
///
/// `default_lane` is used when the line has no lane field or names a lane
/// that does not exist.
pub fn parse_arrival_line(line: &str, default_lane: LaneId) -> Result<Arrival> {
    let mut fields = line.trim().split(',').map(str::trim);

    let id = fields.next().unwrap_or_default();
    if id.is_empty() {
        bail!("missing vehicle id");
    }

    let timestamp = fields.next().context("missing arrival timestamp")?;
    let arrival_time: Timestamp = timestamp
        .parse()
        .with_context(|| format!("invalid arrival timestamp {:?}", timestamp))?;

    let lane = match fields.next().filter(|name| !name.is_empty()) {
        Some(name) => name.parse().unwrap_or_else(|_| {
            debug!("Unknown lane {:?} in arrival {}, using {}", name, id, default_lane);
            default_lane
        }),
        None => default_lane,
    };

    Ok(Arrival::new(lane, VehicleRecord::new(id, arrival_time)))
}

/// Format an arrival in the lane-file line format (without newline)
pub fn format_arrival_line(arrival: &Arrival) -> String {
    format!(
        "{},{},{}",
        arrival.record.id(),
        arrival.record.arrival_time(),
        arrival.lane
    )
}

/// Parse every non-blank line of `lane`'s file, skipping malformed ones
///
/// Every arrival is assigned to `lane`, whatever lane the line names.
pub fn parse_lane_file(contents: &str, lane: LaneId) -> Vec<Arrival> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(number, line)| match parse_arrival_line(line, lane) {
            Ok(mut arrival) => {
                if arrival.lane != lane {
                    debug!(
                        "{} line {} names {}, queuing on {}",
                        lane.file_name(),
                        number + 1,
                        arrival.lane,
                        lane
                    );
                    arrival.lane = lane;
                }
                Some(arrival)
            }
            Err(e) => {
                warn!("Skipping {} line {}: {:#}", lane.file_name(), number + 1, e);
                None
            }
        })
        .collect()
}

/// Read all four lane files under `dir`
///
/// Missing files are skipped. When `truncate` is set each file that was
/// read is emptied afterwards.
pub fn poll_traffic_dir(dir: &Path, truncate: bool) -> Result<Vec<Arrival>> {
    let mut arrivals = Vec::new();

    for lane in LaneId::ALL {
        let path = dir.join(lane.file_name());
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };

        let parsed = parse_lane_file(&contents, lane);
        debug!("Read {} arrivals from {}", parsed.len(), path.display());
        arrivals.extend(parsed);

        if truncate {
            fs::write(&path, "")
                .with_context(|| format!("Failed to truncate {}", path.display()))?;
        }
    }

    Ok(arrivals)
}

/// Append arrivals to the lane file of their lane under `dir`
pub fn append_to_traffic_dir(dir: &Path, arrivals: &[Arrival]) -> Result<()> {
    for arrival in arrivals {
        let path = dir.join(arrival.lane.file_name());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        writeln!(file, "{}", format_arrival_line(arrival))
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}
