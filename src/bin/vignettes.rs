use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;
use std::time::Duration;

extern crate clap;

use clap::{App, Arg, ArgMatches};
use failure::{format_err, Error};
use log::error;
use vignette::encode::to_data_url;
use vignette::{
    BatchSegmenter, ExtractionFallback, PanelContent, SegmentOptions, Strip, StripInfo,
    StripStatus,
};

// Every tunable has a flag; a flag that isn't given keeps the library
// default.
fn parsed<T>(matches: &ArgMatches, name: &str) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match matches.value_of(name) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| format_err!("--{}: cannot use {:?}: {}", name, raw, e)),
    }
}

fn options_from(matches: &ArgMatches) -> Result<SegmentOptions, Error> {
    let mut opts = SegmentOptions::default();
    let sep = &mut opts.separators;
    if let Some(v) = parsed(matches, "band")? {
        sep.band_rows = v;
    }
    if let Some(v) = parsed(matches, "brightness")? {
        sep.brightness_threshold = v;
    }
    if let Some(v) = parsed(matches, "light-ratio")? {
        sep.light_ratio = v;
    }
    if let Some(v) = parsed(matches, "edge-margin")? {
        sep.edge_margin = v;
    }
    if let Some(v) = parsed(matches, "spacing")? {
        sep.min_spacing = v;
    }
    if let Some(v) = parsed(matches, "row-stride")? {
        sep.row_stride = v;
    }
    if let Some(v) = parsed(matches, "column-stride")? {
        sep.column_stride = v;
    }
    if let Some(v) = parsed(matches, "side-margin")? {
        sep.side_margin = v;
    }
    if let Some(v) = parsed(matches, "skip")? {
        opts.regions.separator_skip = v;
    }
    if let Some(v) = parsed(matches, "min-height")? {
        opts.regions.min_region_height = v;
    }
    if let Some(v) = parsed(matches, "min-separators")? {
        opts.regions.min_separators = v;
    }
    if let Some(v) = parsed(matches, "base-panels")? {
        opts.uniform.base_panels = v;
    }
    if let Some(raw) = matches.value_of("breakpoints") {
        opts.uniform.aspect_breakpoints = raw
            .split(',')
            .map(|b| b.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format_err!("--breakpoints: cannot use {:?}: {}", raw, e))?;
    }
    if let Some(policy) = matches.value_of("on-error") {
        opts.on_extraction_error = match policy {
            "skip" => ExtractionFallback::Skip,
            _ => ExtractionFallback::WholeImage,
        };
    }
    opts.validate()?;
    Ok(opts)
}

// Strips are named after their file stem.  Two inputs with the same
// stem (`a/monday.png b/monday.png`) would write over each other's
// panels, so repeats get `-2`, `-3`, ... appended.
fn strips_for<'a, I: Iterator<Item = &'a str>>(paths: I) -> Vec<Strip<PathBuf>> {
    let mut taken = HashSet::new();
    paths
        .map(|raw| {
            let path = PathBuf::from(raw);
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            let mut id = stem.clone();
            let mut n = 1;
            while !taken.insert(id.clone()) {
                n += 1;
                id = format!("{}-{}", stem, n);
            }
            Strip::new(StripInfo::new(id), path)
        })
        .collect()
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn tunable<'a>(name: &'a str, help: &'a str) -> Arg<'a, 'a> {
    Arg::with_name(name)
        .long(name)
        .takes_value(true)
        .value_name("N")
        .help(help)
}

fn main() -> Result<(), Error> {
    let matches = App::new("vignettes")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Cut comic strips into their panels")
        .arg(
            Arg::with_name("strips")
                .help("The strip images to segment")
                .required(true)
                .multiple(true)
                .index(1),
        )
        .arg(
            Arg::with_name("out-dir")
                .short("o")
                .long("out-dir")
                .takes_value(true)
                .value_name("DIR")
                .default_value(".")
                .help("Where to write the panels"),
        )
        .arg(
            Arg::with_name("data-urls")
                .long("data-urls")
                .help("Print each panel as a data: URL instead of writing files"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("More logging; repeat for more"),
        )
        .arg(tunable("band", "Rows examined per candidate separator"))
        .arg(tunable("brightness", "Brightness (0-255) above which a pixel is light"))
        .arg(tunable("light-ratio", "Fraction of light pixels that makes a separator"))
        .arg(tunable("edge-margin", "Rows at top and bottom never considered"))
        .arg(tunable("spacing", "Minimum rows between two separators"))
        .arg(tunable("row-stride", "Rows between candidate separators"))
        .arg(tunable("column-stride", "Columns between sampled pixels"))
        .arg(tunable("side-margin", "Columns at either side not sampled"))
        .arg(tunable("skip", "Rows skipped past each separator"))
        .arg(tunable("min-height", "Shortest panel kept"))
        .arg(tunable("min-separators", "Fewer separators than this divides uniformly"))
        .arg(tunable("base-panels", "Panel count for uniform division of a squat strip"))
        .arg(
            Arg::with_name("breakpoints")
                .long("breakpoints")
                .takes_value(true)
                .value_name("R,R,...")
                .help("Aspect ratios that each add a panel to uniform division"),
        )
        .arg(
            Arg::with_name("on-error")
                .long("on-error")
                .takes_value(true)
                .possible_values(&["skip", "whole"])
                .help("What replaces a panel that cannot be cropped"),
        )
        .arg(tunable("throttle-ms", "Pause between strips, in milliseconds"))
        .get_matches();

    init_logging(matches.occurrences_of("verbose"));

    let options = options_from(&matches)?;
    let mut runner = BatchSegmenter::new(options);
    if let Some(ms) = parsed::<u64>(&matches, "throttle-ms")? {
        runner = runner.with_throttle(Duration::from_millis(ms));
    }

    let strips = matches
        .values_of("strips")
        .map(strips_for)
        .unwrap_or_default();
    let outcome = runner.run(&strips);

    let out_dir = Path::new(matches.value_of("out-dir").unwrap_or("."));
    let data_urls = matches.is_present("data-urls");
    if !data_urls {
        // Each write below will fail and be counted on its own.
        if let Err(err) = fs::create_dir_all(out_dir) {
            error!("cannot create {}: {}", out_dir.display(), err);
        }
    }

    // One panel that can't be written doesn't stop the rest.
    let mut unwritten = 0;
    for panel in &outcome.panels {
        match &panel.content {
            PanelContent::Image(img) if data_urls => match to_data_url(img) {
                Ok(url) => println!("{}\t{}", panel.file_name(), url),
                Err(err) => {
                    error!("{}: {}", panel.file_name(), err);
                    unwritten += 1;
                }
            },
            PanelContent::Image(img) => {
                let target = out_dir.join(panel.file_name());
                if let Err(err) = img.save(&target) {
                    error!("{}: {}", target.display(), err);
                    unwritten += 1;
                }
            }
            PanelContent::Original { source } => {
                eprintln!("{}: could not be segmented, use {} as is", panel.strip.id, source);
            }
        }
    }

    if !data_urls {
        for (info, status) in &outcome.strips {
            match status {
                StripStatus::Segmented { layout, panels } => {
                    println!("{}: {} panels ({:?})", info.id, panels, layout)
                }
                StripStatus::Failed { reason } => println!("{}: failed ({})", info.id, reason),
            }
        }
    }

    if unwritten > 0 {
        eprintln!("{} of {} panels could not be written", unwritten, outcome.panels.len());
        process::exit(1);
    }

    // Emergency panels have nothing to write, so a batch made only of
    // them produced nothing as far as the command line is concerned.
    if outcome.panels.iter().all(|p| p.is_emergency()) {
        eprintln!("no panels produced; could not process the strips, try again");
        process::exit(1);
    }
    if !data_urls {
        println!(
            "{} panels from {} strips",
            outcome.panels.len(),
            outcome.strips.len()
        );
    }
    Ok(())
}
