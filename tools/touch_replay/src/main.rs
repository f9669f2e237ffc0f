use std::{
    collections::VecDeque,
    env,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    process,
};

use embedded_storage::{ReadStorage, Storage};
use tiletouch::{
    AffineTransform, CalibrationModel, CalibrationSession, CalibrationStore, RawTouch,
    SampleError, TouchEvent, TouchManager, TouchSampleSource, DEFAULT_TOUCH_CONFIG,
};

#[derive(Clone, Copy)]
struct ReplaySample {
    ms: u64,
    raw: Option<RawTouch>,
}

struct ReplaySource {
    samples: VecDeque<Option<RawTouch>>,
}

impl TouchSampleSource for ReplaySource {
    type Error = ();

    fn probe(&mut self) -> Result<(), SampleError<Self::Error>> {
        Ok(())
    }

    fn read_sample(&mut self) -> Result<Option<RawTouch>, SampleError<Self::Error>> {
        Ok(self.samples.pop_front().flatten())
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let mut trace_path: Option<PathBuf> = None;
    let mut expect_path: Option<PathBuf> = None;
    let mut transform: Option<AffineTransform> = None;
    let mut calibrate = false;

    let mut idx = 1usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--expect" => {
                idx += 1;
                let Some(path) = args.get(idx) else {
                    return Err("missing path after --expect".into());
                };
                expect_path = Some(PathBuf::from(path));
            }
            "--transform" => {
                idx += 1;
                let Some(values) = args.get(idx) else {
                    return Err("missing coefficients after --transform".into());
                };
                transform = Some(parse_transform(values)?);
            }
            "--calibrate" => calibrate = true,
            "-h" | "--help" => {
                println!("{}", usage());
                return Ok(());
            }
            value if value.starts_with('-') => {
                return Err(format!("unknown argument: {value}"));
            }
            value => {
                if trace_path.is_some() {
                    return Err("multiple trace paths provided".into());
                }
                trace_path = Some(PathBuf::from(value));
            }
        }
        idx += 1;
    }

    let trace_path = trace_path.ok_or_else(usage)?;
    let samples = parse_trace(&trace_path)?;

    if calibrate {
        return print_calibration(&samples);
    }

    let events = replay(&samples, transform);

    println!("event,ms,kind,x,y,start_x,start_y,sensor");
    for event in &events {
        println!(
            "event,{},{},{},{},{},{},{}",
            event.t_ms,
            event.kind,
            event.point.x,
            event.point.y,
            event.start_point.x,
            event.start_point.y,
            event.sensor_index.map_or(-1, i32::from)
        );
    }

    if let Some(expect_path) = expect_path {
        let expected = parse_expected_kinds(&expect_path)?;
        let actual: Vec<&'static str> = events.iter().map(|e| e.kind.as_str()).collect();
        if actual != expected {
            eprintln!("expected kinds: {}", expected.join(","));
            eprintln!("actual kinds:   {}", actual.join(","));
            return Err("event sequence mismatch".into());
        }
    }

    Ok(())
}

fn replay(samples: &[ReplaySample], transform: Option<AffineTransform>) -> Vec<TouchEvent> {
    let source = ReplaySource {
        samples: samples.iter().map(|sample| sample.raw).collect(),
    };
    let mut manager = TouchManager::new(source, DEFAULT_TOUCH_CONFIG);
    let mut store = CalibrationStore::new(NullStorage);
    manager.initialize(&mut store);
    if let Some(transform) = transform {
        manager.set_calibration(CalibrationModel::calibrated(transform));
    }

    let mut events = Vec::new();
    for sample in samples {
        events.extend(manager.update(sample.ms));
    }

    // Flush the release of a press still held when the trace ends.
    if manager.is_touch() {
        let tail_ms = samples.last().map_or(0, |s| s.ms).saturating_add(20);
        events.extend(manager.update(tail_ms));
    }
    events
}

fn print_calibration(samples: &[ReplaySample]) -> Result<(), String> {
    let mut session = CalibrationSession::new(DEFAULT_TOUCH_CONFIG.calibration_targets);
    for sample in samples {
        session.feed(sample.raw);
    }

    let transform = session
        .solve()
        .map_err(|err| format!("calibration failed: {err}"))?;
    for point in session.points() {
        println!(
            "corner,{},{},{},{},{}",
            point.screen_x, point.screen_y, point.touch_x, point.touch_y, point.captured
        );
    }
    let [a, b, c, d, e, f] = transform.to_array();
    println!("transform,{a},{b},{c},{d},{e},{f}");
    Ok(())
}

/// Empty storage: every load falls back to the identity transform.
struct NullStorage;

impl ReadStorage for NullStorage {
    type Error = ();

    fn read(&mut self, _offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        bytes.fill(0xFF);
        Ok(())
    }

    fn capacity(&self) -> usize {
        0
    }
}

impl Storage for NullStorage {
    fn write(&mut self, _offset: u32, _bytes: &[u8]) -> Result<(), Self::Error> {
        Ok(())
    }
}

fn usage() -> String {
    "usage: touch_replay <trace.csv> [--expect expected_kinds.txt] [--transform a,b,c,d,e,f] [--calibrate]"
        .to_string()
}

fn parse_transform(raw: &str) -> Result<AffineTransform, String> {
    let values: Vec<f32> = raw
        .split(',')
        .map(|value| {
            value
                .trim()
                .parse::<f32>()
                .map_err(|e| format!("invalid coefficient '{}': {e}", value.trim()))
        })
        .collect::<Result<_, _>>()?;
    let values: [f32; 6] = values
        .try_into()
        .map_err(|_| "expected six coefficients".to_string())?;
    Ok(AffineTransform::from_array(values))
}

fn parse_trace(path: &Path) -> Result<Vec<ReplaySample>, String> {
    let file = File::open(path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    let reader = BufReader::new(file);

    let mut out: Vec<ReplaySample> = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line_result
            .map_err(|e| format!("failed to read {}:{}: {e}", path.display(), line_no))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if trimmed == "touch_trace,ms,count,x,y" {
            continue;
        }

        let parts: Vec<&str> = trimmed.split(',').collect();
        if parts.len() < 5 {
            return Err(format!(
                "{}:{} invalid trace line, expected 5 columns",
                path.display(),
                line_no
            ));
        }
        if parts[0].trim() != "touch_trace" {
            continue;
        }

        let ms = parse_field::<u64>(parts[1], path, line_no, "ms")?;
        let count = parse_field::<u8>(parts[2], path, line_no, "count")?;
        let x = parse_field::<u16>(parts[3], path, line_no, "x")?;
        let y = parse_field::<u16>(parts[4], path, line_no, "y")?;

        out.push(ReplaySample {
            ms,
            raw: (count > 0).then_some(RawTouch::new(x, y)),
        });
    }

    Ok(out)
}

fn parse_expected_kinds(path: &Path) -> Result<Vec<&'static str>, String> {
    let file = File::open(path).map_err(|e| format!("failed to open {}: {e}", path.display()))?;
    let reader = BufReader::new(file);

    let mut kinds = Vec::new();
    for (line_no, line_result) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line_result
            .map_err(|e| format!("failed to read {}:{}: {e}", path.display(), line_no))?;
        let token = line.trim();
        if token.is_empty() || token.starts_with('#') {
            continue;
        }

        let normalized = normalize_kind(token).ok_or_else(|| {
            format!(
                "{}:{} invalid expected event kind: {}",
                path.display(),
                line_no,
                token
            )
        })?;
        kinds.push(normalized);
    }

    Ok(kinds)
}

fn normalize_kind(kind: &str) -> Option<&'static str> {
    match kind.trim().to_ascii_uppercase().as_str() {
        "DOWN" => Some("DOWN"),
        "MOVE" => Some("MOVE"),
        "UP" => Some("UP"),
        "LONG_PRESS" => Some("LONG_PRESS"),
        "DOUBLE_TAP" => Some("DOUBLE_TAP"),
        "SWIPE_LEFT" => Some("SWIPE_LEFT"),
        "SWIPE_RIGHT" => Some("SWIPE_RIGHT"),
        "SWIPE_UP" => Some("SWIPE_UP"),
        "SWIPE_DOWN" => Some("SWIPE_DOWN"),
        _ => None,
    }
}

fn parse_field<T>(raw: &str, path: &Path, line_no: usize, field: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| {
        format!(
            "{}:{} invalid {} '{}': {}",
            path.display(),
            line_no,
            field,
            raw.trim(),
            e
        )
    })
}
