use matrixd_log as logging;

mod report;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use matrixd_chainparams::ChainParams;
use matrixd_consensus::{hash256_to_hex, Network};
use matrixd_log::{log_debug, log_info, log_warn};

pub use report::ParamsReport;

const DEFAULT_DATA_DIR: &str = "data";
const CONF_FILE_NAME: &str = "matrix.conf";
const SUPPORTED_CONF_KEYS: [&str; 4] = ["logformat", "loglevel", "logtimestamps", "testnet"];

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub network: Network,
    pub data_dir: PathBuf,
    pub conf_path: PathBuf,
    pub log: logging::LogConfig,
    pub print_params: bool,
    pub unsupported_conf_keys: Vec<String>,
}

impl Config {
    /// Directory the selected network keeps its state in.
    pub fn network_data_dir(&self, params: &ChainParams) -> PathBuf {
        let sub = params.data_dir();
        if sub.is_empty() {
            self.data_dir.clone()
        } else {
            self.data_dir.join(sub)
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum CliAction {
    Run(Config),
    PrintHelp,
    PrintVersion,
}

pub fn run_entry() -> Result<(), String> {
    match parse_args_from(std::env::args().skip(1))? {
        CliAction::PrintHelp => {
            println!("{}", usage());
            Ok(())
        }
        CliAction::PrintVersion => {
            println!("matrixd {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliAction::Run(config) => run_with_config(config),
    }
}

pub fn run_with_config(config: Config) -> Result<(), String> {
    logging::init(config.log);
    if !config.unsupported_conf_keys.is_empty() {
        log_warn!(
            "Ignoring unsupported keys in {}: {}",
            config.conf_path.display(),
            config.unsupported_conf_keys.join(", ")
        );
    }

    matrixd_chainparams::init().map_err(|err| format!("chain parameters: {err}"))?;
    let params =
        matrixd_chainparams::select_params(config.network).map_err(|err| err.to_string())?;
    let data_dir = config.network_data_dir(params);
    log_info!(
        "Network {} genesis {} (p2p port {}, rpc port {})",
        params.network(),
        hash256_to_hex(&params.genesis_hash()),
        params.default_port(),
        params.rpc_port()
    );
    log_debug!(
        "Data dir {} ({} dns seeds, {} fixed seeds)",
        data_dir.display(),
        params.dns_seeds().len(),
        params.fixed_seeds().len()
    );

    if config.print_params {
        let report = ParamsReport::from(params);
        let rendered = serde_json::to_string_pretty(&report).map_err(|err| err.to_string())?;
        println!("{rendered}");
    }
    Ok(())
}

pub fn parse_args_from<I>(raw_args: I) -> Result<CliAction, String>
where
    I: IntoIterator<Item = String>,
{
    let mut data_dir: Option<PathBuf> = None;
    let mut conf_path: Option<PathBuf> = None;
    let mut network = Network::Mainnet;
    let mut network_set = false;
    let mut log_level = logging::Level::Info;
    let mut log_level_set = false;
    let mut log_format = logging::Format::Text;
    let mut log_format_set = false;
    let mut log_timestamps = true;
    let mut log_timestamps_set = false;
    let mut print_params = false;

    let mut args = raw_args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" | "help" => return Ok(CliAction::PrintHelp),
            "--version" | "-V" | "version" => return Ok(CliAction::PrintVersion),
            "--data-dir" | "--datadir" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("missing value for --data-dir\n{}", usage()))?;
                data_dir = Some(PathBuf::from(value));
            }
            "--conf" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("missing value for --conf\n{}", usage()))?;
                conf_path = Some(PathBuf::from(value));
            }
            "--testnet" => {
                if network_set && network != Network::Testnet {
                    return Err(format!("--testnet conflicts with --network\n{}", usage()));
                }
                network = Network::Testnet;
                network_set = true;
            }
            "--network" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("missing value for --network\n{}", usage()))?;
                let parsed = value.parse::<Network>().map_err(|_| {
                    format!("invalid network '{value}' (expected main|test)\n{}", usage())
                })?;
                if network_set && network != parsed {
                    return Err(format!("--network {value} conflicts with --testnet\n{}", usage()));
                }
                network = parsed;
                network_set = true;
            }
            "--log-level" | "--loglevel" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("missing value for --log-level\n{}", usage()))?;
                log_level = logging::Level::parse(&value).ok_or_else(|| {
                    format!(
                        "invalid log level '{value}' (expected error|warn|info|debug|trace)\n{}",
                        usage()
                    )
                })?;
                log_level_set = true;
            }
            "--log-format" | "--logformat" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("missing value for --log-format\n{}", usage()))?;
                log_format = logging::Format::parse(&value).ok_or_else(|| {
                    format!("invalid log format '{value}' (expected text|json)\n{}", usage())
                })?;
                log_format_set = true;
            }
            "--log-timestamps" | "--logtimestamps" => {
                log_timestamps = true;
                log_timestamps_set = true;
            }
            "--no-log-timestamps" | "--no-logtimestamps" => {
                log_timestamps = false;
                log_timestamps_set = true;
            }
            "--print-params" => print_params = true,
            other => return Err(format!("unknown argument '{other}'\n{}", usage())),
        }
    }

    let data_dir = data_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    let conf_file = conf_path.unwrap_or_else(|| data_dir.join(CONF_FILE_NAME));
    let mut unsupported_conf_keys = Vec::new();
    if let Some(conf) = load_conf(&conf_file)? {
        if !network_set {
            if let Some(raw) = last_value(&conf, "testnet") {
                match parse_conf_bool(raw) {
                    Some(true) => network = Network::Testnet,
                    Some(false) => {}
                    None => {
                        return Err(format!(
                            "invalid testnet value '{raw}' in {}",
                            conf_file.display()
                        ));
                    }
                }
            }
        }
        if !log_level_set {
            if let Some(raw) = last_value(&conf, "loglevel") {
                log_level = logging::Level::parse(raw).ok_or_else(|| {
                    format!("invalid loglevel '{raw}' in {}", conf_file.display())
                })?;
            }
        }
        if !log_format_set {
            if let Some(raw) = last_value(&conf, "logformat") {
                log_format = logging::Format::parse(raw).ok_or_else(|| {
                    format!("invalid logformat '{raw}' in {}", conf_file.display())
                })?;
            }
        }
        if !log_timestamps_set {
            if let Some(raw) = last_value(&conf, "logtimestamps") {
                log_timestamps = parse_conf_bool(raw).ok_or_else(|| {
                    format!("invalid logtimestamps value '{raw}' in {}", conf_file.display())
                })?;
            }
        }

        let mut unsupported: Vec<String> = conf
            .keys()
            .filter(|key| !SUPPORTED_CONF_KEYS.contains(&key.as_str()))
            .cloned()
            .collect();
        unsupported.sort();
        unsupported_conf_keys = unsupported;
    }

    Ok(CliAction::Run(Config {
        network,
        data_dir,
        conf_path: conf_file,
        log: logging::LogConfig {
            level: log_level,
            format: log_format,
            timestamps: log_timestamps,
        },
        print_params,
        unsupported_conf_keys,
    }))
}

fn last_value<'a>(conf: &'a HashMap<String, Vec<String>>, key: &str) -> Option<&'a str> {
    conf.get(key)
        .and_then(|values| values.last())
        .map(String::as_str)
}

/// Reads a `key=value` config file. A missing file is not an error.
fn load_conf(path: &Path) -> Result<Option<HashMap<String, Vec<String>>>, String> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(format!("failed to read {}: {err}", path.display())),
    };

    let mut out: HashMap<String, Vec<String>> = HashMap::new();
    for raw_line in contents.lines() {
        let mut line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if let Some(idx) = line.find(['#', ';']) {
            line = line[..idx].trim();
        }
        if line.is_empty() {
            continue;
        }
        let (key, value) = match line.split_once('=') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => (line, "1"),
        };
        if key.is_empty() {
            continue;
        }
        out.entry(key.to_ascii_lowercase())
            .or_default()
            .push(value.to_string());
    }
    Ok(Some(out))
}

fn parse_conf_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.is_empty() {
        return Some(true);
    }
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

pub fn usage() -> String {
    [
        "Usage:",
        "  matrixd [options]",
        "",
        "Options:",
        "  --help, -h  Print this help and exit",
        "  --version, -V  Print version and exit",
        "  --testnet  Use the test network",
        "  --network <main|test>  Network to run (default: main)",
        "  --data-dir <path>  Base data directory (default: ./data)",
        "  --conf <path>  Config file (default: <data-dir>/matrix.conf)",
        "  --log-level <level>  error|warn|info|debug|trace (default: info)",
        "  --log-format <text|json>  Log line format (default: text)",
        "  --log-timestamps  Prefix log lines with a UTC timestamp (default)",
        "  --no-log-timestamps  Omit log timestamps",
        "  --print-params  Print the selected network's parameters as JSON",
        "",
        "Config keys (matrix.conf):",
        "  testnet=1  loglevel=<level>  logformat=<text|json>  logtimestamps=<0|1>",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    fn run_config(action: CliAction) -> Config {
        match action {
            CliAction::Run(config) => config,
            other => panic!("expected run action, got {other:?}"),
        }
    }

    fn empty_data_dir() -> tempfile::TempDir {
        tempfile::tempdir().expect("tempdir")
    }

    #[test]
    fn defaults_to_mainnet() {
        let dir = empty_data_dir();
        let data_dir = dir.path().to_string_lossy().to_string();
        let config = run_config(parse_args_from(args(&["--data-dir", &data_dir])).expect("parse"));
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.conf_path, dir.path().join("matrix.conf"));
        assert_eq!(config.log, logging::LogConfig::default());
        assert!(!config.print_params);
        assert!(config.unsupported_conf_keys.is_empty());
    }

    #[test]
    fn help_and_version() {
        assert_eq!(parse_args_from(args(&["--help"])), Ok(CliAction::PrintHelp));
        assert_eq!(parse_args_from(args(&["-V"])), Ok(CliAction::PrintVersion));
    }

    #[test]
    fn testnet_flag_and_network_option() {
        let dir = empty_data_dir();
        let data_dir = dir.path().to_string_lossy().to_string();
        let config = run_config(
            parse_args_from(args(&["--testnet", "--data-dir", &data_dir])).expect("parse"),
        );
        assert_eq!(config.network, Network::Testnet);

        let config = run_config(
            parse_args_from(args(&["--network", "testnet", "--data-dir", &data_dir]))
                .expect("parse"),
        );
        assert_eq!(config.network, Network::Testnet);

        let err = parse_args_from(args(&["--testnet", "--network", "main"])).unwrap_err();
        assert!(err.contains("conflicts"));
        let err = parse_args_from(args(&["--network", "signet"])).unwrap_err();
        assert!(err.starts_with("invalid network 'signet'"));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert!(parse_args_from(args(&["--bogus"]))
            .unwrap_err()
            .starts_with("unknown argument '--bogus'"));
        assert!(parse_args_from(args(&["--log-level"]))
            .unwrap_err()
            .starts_with("missing value for --log-level"));
        assert!(parse_args_from(args(&["--log-format", "xml"]))
            .unwrap_err()
            .starts_with("invalid log format 'xml'"));
    }

    #[test]
    fn conf_file_sets_network_and_logging() {
        let dir = empty_data_dir();
        let mut file = fs::File::create(dir.path().join("matrix.conf")).expect("create");
        writeln!(
            file,
            "# matrix node\ntestnet\nloglevel=debug ; verbose\nlogformat = JSON\nlogtimestamps=0\nrpcport=1234"
        )
        .expect("write");
        drop(file);

        let data_dir = dir.path().to_string_lossy().to_string();
        let config = run_config(parse_args_from(args(&["--data-dir", &data_dir])).expect("parse"));
        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.log.level, logging::Level::Debug);
        assert_eq!(config.log.format, logging::Format::Json);
        assert!(!config.log.timestamps);
        assert_eq!(config.unsupported_conf_keys, vec!["rpcport".to_string()]);
    }

    #[test]
    fn command_line_overrides_conf_file() {
        let dir = empty_data_dir();
        let conf = dir.path().join("custom.conf");
        fs::write(&conf, "testnet=1\nloglevel=trace\nlogtimestamps=no\n").expect("write");

        let config = run_config(
            parse_args_from(args(&[
                "--conf",
                &conf.to_string_lossy(),
                "--network",
                "main",
                "--log-level",
                "warn",
                "--log-timestamps",
            ]))
            .expect("parse"),
        );
        assert_eq!(config.conf_path, conf);
        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.log.level, logging::Level::Warn);
        assert!(config.log.timestamps);
    }

    #[test]
    fn invalid_conf_values_are_errors() {
        let dir = empty_data_dir();
        let conf = dir.path().join("matrix.conf");
        fs::write(&conf, "testnet=maybe\n").expect("write");
        let data_dir = dir.path().to_string_lossy().to_string();
        let err = parse_args_from(args(&["--data-dir", &data_dir])).unwrap_err();
        assert!(err.starts_with("invalid testnet value 'maybe'"));
    }

    #[test]
    fn conf_loader_keeps_repeated_keys_in_order() {
        let dir = empty_data_dir();
        let conf = dir.path().join("matrix.conf");
        fs::write(&conf, "LogLevel=info\n\n;comment\nloglevel=debug#trailing\n=skipped\n")
            .expect("write");
        let parsed = load_conf(&conf).expect("load").expect("present");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed["loglevel"], vec!["info".to_string(), "debug".to_string()]);

        assert_eq!(load_conf(&dir.path().join("absent.conf")), Ok(None));
    }

    #[test]
    fn conf_bool_values() {
        assert_eq!(parse_conf_bool(""), Some(true));
        assert_eq!(parse_conf_bool("Yes"), Some(true));
        assert_eq!(parse_conf_bool("0"), Some(false));
        assert_eq!(parse_conf_bool("2"), None);
    }

    #[test]
    fn network_data_dir_appends_testnet() {
        let registry = matrixd_chainparams::Registry::build().expect("registry");
        let dir = empty_data_dir();
        let data_dir = dir.path().to_string_lossy().to_string();
        let config = run_config(parse_args_from(args(&["--data-dir", &data_dir])).expect("parse"));
        assert_eq!(
            config.network_data_dir(registry.get(Network::Mainnet)),
            dir.path().to_path_buf()
        );
        assert_eq!(
            config.network_data_dir(registry.get(Network::Testnet)),
            dir.path().join("testnet")
        );
    }
}
