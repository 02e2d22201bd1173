//! Rollcall CLI
//!
//! Command-line interface for issuing attendance tokens, judging scanned
//! QR payloads and measuring distances, independently of the mobile apps.

use rollcall_core::{haversine_distance_meters, logging, Config, GeoCoordinate};
use rollcall_crypto::{HmacSigner, LegacySigner, TokenVerifier};
use rollcall_token::{AttendanceToken, CheckInVerdict, Location, TokenIssuer, TokenValidator};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process;

/// JSON output for issue command
#[derive(Debug, Serialize)]
struct IssueOutput {
    token: AttendanceToken,
    qr_payload: String,
}

/// JSON output for distance command
#[derive(Debug, Serialize)]
struct DistanceOutput {
    distance_m: f64,
}

/// Flags that take no value.
const SWITCHES: &[&str] = &["--legacy"];

fn parse_flags(args: &[String]) -> Result<HashMap<String, String>, String> {
    let mut flags = HashMap::new();
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        if !flag.starts_with("--") {
            return Err(format!("Unexpected argument: {}", flag));
        }
        if SWITCHES.contains(&flag) {
            flags.insert(flag.to_string(), String::new());
        } else {
            i += 1;
            let value = args
                .get(i)
                .ok_or_else(|| format!("{} was provided without a value", flag))?;
            flags.insert(flag.to_string(), value.clone());
        }
        i += 1;
    }
    Ok(flags)
}

fn parse_f64(flags: &HashMap<String, String>, name: &str) -> Result<Option<f64>, String> {
    flags
        .get(name)
        .map(|v| {
            v.parse::<f64>()
                .map_err(|_| format!("{} must be a number, got {}", name, v))
        })
        .transpose()
}

fn required<'a>(flags: &'a HashMap<String, String>, name: &str) -> Result<&'a str, String> {
    flags
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| format!("Missing {} argument", name))
}

fn load_config(flags: &HashMap<String, String>) -> Result<Config, String> {
    match flags.get("--config") {
        Some(path) => Config::from_file(PathBuf::from(path))
            .map_err(|e| format!("Failed to load config {}: {}", path, e)),
        None => Ok(Config::default_config()),
    }
}

fn hmac_signer(flags: &HashMap<String, String>, config: &Config) -> Result<HmacSigner, String> {
    let secret_hex = flags
        .get("--secret-hex")
        .or(config.issuance.signing_secret_hex.as_ref())
        .ok_or("No signing secret: pass --secret-hex or set issuance.signing_secret_hex")?;
    HmacSigner::from_hex(secret_hex).map_err(|e| format!("Invalid signing secret: {}", e))
}

fn coordinate_flags(flags: &HashMap<String, String>) -> Result<Option<GeoCoordinate>, String> {
    match (parse_f64(flags, "--lat")?, parse_f64(flags, "--lon")?) {
        (Some(lat), Some(lon)) => GeoCoordinate::new(lat, lon)
            .map(Some)
            .map_err(|e| e.to_string()),
        (None, None) => Ok(None),
        _ => Err("--lat and --lon must be given together".to_string()),
    }
}

fn venue_flags(flags: &HashMap<String, String>) -> Result<Option<Location>, String> {
    let accuracy = parse_f64(flags, "--accuracy")?;
    match (coordinate_flags(flags)?, accuracy) {
        (Some(coordinate), accuracy) => Ok(Some(Location::new(
            coordinate.latitude,
            coordinate.longitude,
            accuracy.unwrap_or(0.0),
        ))),
        (None, Some(_)) => Err("--accuracy requires --lat and --lon".to_string()),
        (None, None) => Ok(None),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize output: {}", e))?;
    println!("{}", rendered);
    Ok(())
}

fn cmd_issue(flags: &HashMap<String, String>, config: &Config) -> Result<(), String> {
    let course_id = required(flags, "--course")?;
    let instructor_id = required(flags, "--instructor")?;

    let location = venue_flags(flags)?;

    let issuer = TokenIssuer::from_config(hmac_signer(flags, config)?, &config.issuance)
        .map_err(|e| e.to_string())?;
    let token = issuer
        .issue(course_id, instructor_id, location)
        .map_err(|e| format!("Failed to issue token: {}", e))?;
    let qr_payload = token.to_qr_payload().map_err(|e| e.to_string())?;

    print_json(&IssueOutput { token, qr_payload })
}

fn judge<V: TokenVerifier>(
    verifier: V,
    config: &Config,
    token: &AttendanceToken,
    scanner: Option<GeoCoordinate>,
    now: Option<u64>,
) -> Result<CheckInVerdict, String> {
    let validator = TokenValidator::from_config(verifier, config).map_err(|e| e.to_string())?;
    Ok(match now {
        Some(now) => validator.check_in_at(token, scanner, now),
        None => validator.check_in(token, scanner),
    })
}

fn cmd_verify(flags: &HashMap<String, String>, config: &Config) -> Result<(), String> {
    let payload = required(flags, "--payload")?;
    let token = AttendanceToken::from_qr_payload(payload)
        .map_err(|e| format!("Failed to decode payload: {}", e))?;
    let scanner = coordinate_flags(flags)?;
    let now = flags
        .get("--now")
        .map(|v| {
            v.parse::<u64>()
                .map_err(|_| format!("--now must be Unix milliseconds, got {}", v))
        })
        .transpose()?;

    let verdict = if flags.contains_key("--legacy") {
        judge(LegacySigner, config, &token, scanner, now)?
    } else {
        judge(hmac_signer(flags, config)?, config, &token, scanner, now)?
    };

    print_json(&verdict)?;
    if verdict.accepted {
        Ok(())
    } else {
        Err("Check-in rejected".to_string())
    }
}

fn cmd_distance(args: &[String]) -> Result<(), String> {
    if args.len() != 4 {
        return Err("distance takes exactly four arguments: LAT1 LON1 LAT2 LON2".to_string());
    }
    let values = args
        .iter()
        .map(|v| {
            v.parse::<f64>()
                .map_err(|_| format!("Not a number: {}", v))
        })
        .collect::<Result<Vec<f64>, String>>()?;

    let distance_m = haversine_distance_meters(values[0], values[1], values[2], values[3])
        .map_err(|e| e.to_string())?;
    print_json(&DistanceOutput { distance_m })
}

fn parse_args() -> Result<(String, Vec<String>), String> {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        return Err("Usage: rollcall-cli <command> [options]".to_string());
    }

    Ok((args[1].clone(), args[2..].to_vec()))
}

fn print_usage() {
    println!("Rollcall CLI - Issue and verify attendance QR tokens");
    println!();
    println!("USAGE:");
    println!("    rollcall-cli issue --course <id> --instructor <id> [--lat <deg> --lon <deg>] [--accuracy <m>]");
    println!("                       [--config <file>] [--secret-hex <hex>]");
    println!("    rollcall-cli verify --payload <qr> [--lat <deg> --lon <deg>] [--now <ms>]");
    println!("                        [--config <file>] [--secret-hex <hex> | --legacy]");
    println!("    rollcall-cli distance <lat1> <lon1> <lat2> <lon2>");
    println!();
    println!("COMMANDS:");
    println!("    issue       Mint a signed token and its QR payload");
    println!("    verify      Judge a scanned QR payload (exit code 1 when rejected)");
    println!("    distance    Haversine distance in meters");
    println!();
    println!("EXAMPLES:");
    println!("    rollcall-cli issue --course CS101 --instructor instr-1 --lat -1.2921 --lon 36.8219");
    println!("    rollcall-cli verify --payload eyJ0eXBlIjoi... --lat -1.2922 --lon 36.8219");
    println!("    rollcall-cli distance -1.2921 36.8219 -1.2921 36.8229");
}

fn run(command: &str, args: &[String]) -> Result<(), String> {
    if command == "distance" {
        return cmd_distance(args);
    }

    let flags = parse_flags(args)?;
    let config = load_config(&flags)?;
    logging::init_from_config(&config.logging);

    match command {
        "issue" => cmd_issue(&flags, &config),
        "verify" => cmd_verify(&flags, &config),
        _ => Err(format!("Unknown command: {}", command)),
    }
}

fn main() {
    let (command, args) = match parse_args() {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("Error: {}", e);
            println!();
            print_usage();
            process::exit(1);
        }
    };

    if matches!(command.as_str(), "help" | "--help" | "-h") {
        print_usage();
        return;
    }

    if let Err(e) = run(&command, &args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(args: &[&str]) -> HashMap<String, String> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        parse_flags(&args).unwrap()
    }

    #[test]
    fn test_venue_with_accuracy() {
        let venue = venue_flags(&flags(&["--lat", "-1.29", "--lon", "36.82", "--accuracy", "8"]))
            .unwrap()
            .unwrap();
        assert_eq!(venue.accuracy, 8.0);
        assert_eq!(venue.latitude, -1.29);
    }

    #[test]
    fn test_venue_accuracy_defaults_to_zero() {
        let venue = venue_flags(&flags(&["--lat", "0", "--lon", "0"]))
            .unwrap()
            .unwrap();
        assert_eq!(venue.accuracy, 0.0);
    }

    #[test]
    fn test_lone_accuracy_rejected() {
        let result = venue_flags(&flags(&["--course", "CS101", "--accuracy", "8"]));
        assert!(result.unwrap_err().contains("--accuracy"));
    }

    #[test]
    fn test_no_venue() {
        assert!(venue_flags(&flags(&["--course", "CS101"])).unwrap().is_none());
    }

    #[test]
    fn test_lone_latitude_rejected() {
        assert!(coordinate_flags(&flags(&["--lat", "1.0"])).is_err());
    }
}
