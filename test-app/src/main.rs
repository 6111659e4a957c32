// pluglib test application -- CLI tool for exercising the library end to
// end: read a YAML codeplug, verify it against a radio model, encode it
// into binary images, and round-trip it through a mock radio.
//
// Usage:
//   pluglib-test-app list
//   pluglib-test-app verify codeplug.yaml
//   pluglib-test-app verify codeplug.yaml --firmware V101
//   pluglib-test-app roundtrip codeplug.yaml
//   pluglib-test-app encode codeplug.yaml --output-dir ./images
//   pluglib-test-app callsign-db users.txt --limit 5 --output db.bin
//
// The `callsign-db` input is one `id,call,name` record per line.

use std::fs;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use pluglib::image::Image;
use pluglib::opengd77::{self, CallsignDb, OpenGd77Codeplug, UserRecord};
use pluglib::{max_severity, yaml, Severity};
use pluglib_test_harness::MockRadioMemory;

/// pluglib test application -- exercises the codeplug pipeline from the
/// command line.
#[derive(Parser)]
#[command(name = "pluglib-test-app", version, about)]
struct Cli {
    /// Log level filter (e.g. debug, pluglib_yaml=trace).
    #[arg(long, default_value = "info")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the supported radio models and their limits.
    List,

    /// Read a YAML codeplug and verify it against the OpenGD77 model.
    Verify {
        /// The YAML codeplug file.
        file: PathBuf,
        /// Firmware version reported by the radio, for the advisory
        /// version check.
        #[arg(long)]
        firmware: Option<String>,
        /// Treat warnings as errors for the exit code.
        #[arg(long)]
        strict: bool,
    },

    /// Encode a YAML codeplug, push it through a mock radio, decode it
    /// back and print the resulting document.
    Roundtrip {
        /// The YAML codeplug file.
        file: PathBuf,
    },

    /// Encode a YAML codeplug into binary image files.
    Encode {
        /// The YAML codeplug file.
        file: PathBuf,
        /// Directory the `eeprom.bin` / `flash.bin` images are written to.
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Encode a callsign database from `id,call,name` records.
    CallsignDb {
        /// Input file, one record per line.
        file: PathBuf,
        /// Maximum number of entries to select.
        #[arg(long)]
        limit: Option<usize>,
        /// Output image file.
        #[arg(long, default_value = "callsign-db.bin")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(cli.log.as_str())
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::List => list(),
        Command::Verify {
            file,
            firmware,
            strict,
        } => verify(&file, firmware.as_deref(), strict),
        Command::Roundtrip { file } => roundtrip(&file),
        Command::Encode { file, output_dir } => encode(&file, &output_dir),
        Command::CallsignDb {
            file,
            limit,
            output,
        } => callsign_db(&file, limit, &output),
    }
}

fn read_config(file: &Path) -> Result<pluglib::Config> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    yaml::read_string(&text).with_context(|| format!("cannot parse {}", file.display()))
}

fn list() -> Result<()> {
    for radio in pluglib::supported_radios() {
        println!("{}", radio.model_name);
        println!("  firmware:    {}", radio.supported_firmware);
        println!(
            "  modes:       {}{}",
            if radio.has_fm { "FM " } else { "" },
            if radio.has_dmr { "DMR" } else { "" }
        );
        let bands: Vec<String> = radio
            .frequency_ranges
            .iter()
            .map(|r| format!("{:.0}-{:.0} MHz", r.low.mhz(), r.high.mhz()))
            .collect();
        println!("  tx bands:    {}", bands.join(", "));
        println!("  channels:    {}", radio.max_channels);
        println!("  zones:       {}", radio.max_zones);
        println!("  contacts:    {}", radio.max_contacts);
        println!("  group lists: {}", radio.max_group_lists);
        println!("  scan lists:  {}", radio.max_scan_lists);
        println!(
            "  roaming:     {}",
            if radio.has_roaming {
                format!("{} zones", radio.max_roaming_zones)
            } else {
                "no".into()
            }
        );
        println!(
            "  callsign DB: {}",
            if radio.has_callsign_db {
                format!("{} entries", radio.max_callsign_db_entries)
            } else {
                "no".into()
            }
        );
    }
    Ok(())
}

fn verify(file: &Path, firmware: Option<&str>, strict: bool) -> Result<()> {
    let config = read_config(file)?;
    let issues = opengd77::verify(&config, firmware);
    for issue in &issues {
        println!("{issue}");
    }
    match max_severity(&issues) {
        None => {
            println!("OK: configuration fits the radio");
            Ok(())
        }
        Some(Severity::Warning) if !strict => {
            println!("OK with warnings");
            Ok(())
        }
        Some(severity) => bail!("verification failed at severity {severity}"),
    }
}

fn roundtrip(file: &Path) -> Result<()> {
    let config = read_config(file)?;

    let mut plug = OpenGd77Codeplug::new();
    plug.encode(&config).context("encode failed")?;

    let mut radio = MockRadioMemory::new();
    plug.write_to(&mut radio).context("write to radio failed")?;
    info!(
        writes = radio.write_count(),
        "codeplug written to mock radio"
    );

    let mut readback = OpenGd77Codeplug::new();
    readback
        .read_from(&mut radio)
        .context("read from radio failed")?;
    let decoded = readback.decode().context("decode failed")?;

    let text = yaml::write_string(&decoded).context("serialize failed")?;
    print!("{text}");
    Ok(())
}

fn write_image(image: &Image, path: &Path) -> Result<()> {
    let mut file =
        fs::File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
    for el in image.elements() {
        file.seek(SeekFrom::Start(el.address() as u64))?;
        file.write_all(el.data())?;
    }
    info!(
        image = image.name(),
        bytes = image.size(),
        path = %path.display(),
        "image written"
    );
    Ok(())
}

fn encode(file: &Path, output_dir: &Path) -> Result<()> {
    let config = read_config(file)?;

    let issues = opengd77::verify(&config, None);
    if max_severity(&issues) == Some(Severity::Error) {
        for issue in &issues {
            eprintln!("{issue}");
        }
        bail!("configuration does not fit the radio");
    }

    let mut plug = OpenGd77Codeplug::new();
    plug.encode(&config).context("encode failed")?;

    fs::create_dir_all(output_dir)?;
    write_image(plug.eeprom(), &output_dir.join("eeprom.bin"))?;
    write_image(plug.flash(), &output_dir.join("flash.bin"))?;
    Ok(())
}

fn parse_users(text: &str) -> Result<Vec<UserRecord>> {
    let mut users = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.splitn(3, ',');
        let id = fields
            .next()
            .unwrap_or_default()
            .trim()
            .parse::<u32>()
            .with_context(|| format!("line {}: bad id", lineno + 1))?;
        let call = fields
            .next()
            .with_context(|| format!("line {}: missing callsign", lineno + 1))?
            .trim();
        let name = fields.next().unwrap_or_default().trim();
        users.push(UserRecord::new(id, call, name));
    }
    Ok(users)
}

fn callsign_db(file: &Path, limit: Option<usize>, output: &Path) -> Result<()> {
    let text = fs::read_to_string(file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    let users = parse_users(&text)?;
    info!(candidates = users.len(), "callsign records loaded");

    let mut db = CallsignDb::new();
    db.encode(&users, limit).context("encode failed")?;
    write_image(db.image(), output)?;
    println!(
        "{} entries written to {}",
        db.decode().map(|u| u.len()).unwrap_or(0),
        output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_users_skips_comments_and_blanks() {
        let users = parse_users("# header\n2621370,DM3MAT,Max\n\n1234567,W1AW\n").unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].call, "DM3MAT");
        assert_eq!(users[0].name, "Max");
        assert_eq!(users[1].name, "");
    }

    #[test]
    fn parse_users_rejects_bad_id() {
        assert!(parse_users("notanumber,DM3MAT\n").is_err());
    }

    #[test]
    fn image_files_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let yaml_path = dir.path().join("plug.yaml");
        fs::write(
            &yaml_path,
            "version: \"0.12.0\"\nchannels: []\nzones: []\n",
        )
        .unwrap();
        encode(&yaml_path, dir.path()).unwrap();
        assert!(dir.path().join("eeprom.bin").exists());
        assert!(dir.path().join("flash.bin").exists());
    }
}
