use anyhow::{Context, Result};
use clap::{Arg, Command};
use remote_config::common::init_logging;
use remote_config::settings::ClientSettings;
use remote_config::Application;
use remote_config_core::LoadMode;
use tracing::info;

fn cli() -> Command {
    Command::new("remote-config")
        .version(env!("CARGO_PKG_VERSION"))
        .about("后端无关的远程配置客户端")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("配置文件路径")
                .global(true),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("日志级别")
                .value_parser(["trace", "debug", "info", "warn", "error"])
                .global(true),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_name("FORMAT")
                .help("日志格式")
                .value_parser(["json", "pretty"])
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("load")
                .about("加载配置并输出解析结果")
                .arg(
                    Arg::new("env")
                        .short('e')
                        .long("env")
                        .value_name("ENV")
                        .help("环境名称（默认使用配置文件中的值）"),
                )
                .arg(
                    Arg::new("config-version")
                        .short('v')
                        .long("config-version")
                        .value_name("VERSION")
                        .help("配置版本"),
                )
                .arg(
                    Arg::new("mode")
                        .short('m')
                        .long("mode")
                        .value_name("MODE")
                        .help("加载模式")
                        .value_parser(["local_only", "remote_only", "hybrid"]),
                ),
        )
        .subcommand(Command::new("clear-cache").about("清除本地配置缓存"))
        .subcommand(Command::new("show-settings").about("输出生效的客户端配置"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();

    let config_path = matches.get_one::<String>("config").map(String::as_str);
    let mut settings = ClientSettings::load(config_path)?;

    if let Some(level) = matches.get_one::<String>("log-level") {
        settings.logging.level = level.clone();
    }
    if let Some(format) = matches.get_one::<String>("log-format") {
        settings.logging.format = format.clone();
    }
    init_logging(&settings.logging.level, &settings.logging.format)?;

    match matches.subcommand() {
        Some(("load", sub)) => {
            if let Some(mode) = sub.get_one::<String>("mode") {
                settings.client.mode = mode.parse::<LoadMode>()?;
            }
            let env = sub.get_one::<String>("env").map(String::as_str);
            let version = sub.get_one::<String>("config-version").map(String::as_str);

            let app = Application::new(settings)?;
            let resolved = app.load(env, version).await?;
            info!("配置来源: {:?}", resolved.origin);

            let output =
                serde_json::to_string_pretty(&resolved).context("序列化解析结果失败")?;
            println!("{output}");
        }
        Some(("clear-cache", _)) => {
            let app = Application::new(settings)?;
            app.clear_cache().await?;
            println!("本地配置缓存已清除");
        }
        Some(("show-settings", _)) => {
            print!("{}", settings.to_toml()?);
        }
        _ => unreachable!("subcommand_required"),
    }

    Ok(())
}
