use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 未設定 `RUST_LOG` 時的預設過濾規則。
/// verbose 時連同 reqwest 的請求紀錄一起輸出，hyper 的連線細節仍壓在 info。
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "container_analysis_samples=debug,reqwest=debug,hyper=info,hyper_util=info,warn"
    } else {
        "container_analysis_samples=info,reqwest=warn,hyper=warn,hyper_util=warn,warn"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(verbose)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// 結構化日誌輸出，供在容器或排程環境中執行時使用。
/// 保留 target 欄位，方便區分本程式與 HTTP 堆疊的紀錄。
pub fn init_json_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(),
        )
        .init();
}
