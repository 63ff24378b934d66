//! 系统代理配置工具
//!
//! 分析服务在部分网络环境下必须走系统代理才能访问，
//! 启动时读取系统代理设置并写入环境变量供 reqwest 使用

#[cfg(any(target_os = "macos", target_os = "windows"))]
use tracing::info;
#[cfg(target_os = "windows")]
use tracing::warn;

/// 同时写入大小写两种形式的代理环境变量
#[cfg(any(target_os = "macos", target_os = "windows"))]
fn set_proxy_env(scheme: &str, proxy_url: &str) {
    match scheme {
        "http" => {
            std::env::set_var("HTTP_PROXY", proxy_url);
            std::env::set_var("http_proxy", proxy_url);
        }
        "https" => {
            std::env::set_var("HTTPS_PROXY", proxy_url);
            std::env::set_var("https_proxy", proxy_url);
        }
        _ => return,
    }
    info!("已设置 {} 代理: {}", scheme.to_uppercase(), proxy_url);
}

/// 配置系统代理（macOS）
///
/// 通过 scutil 命令读取系统代理设置，并设置相应的环境变量
#[cfg(target_os = "macos")]
pub fn setup_system_proxy_macos() {
    use std::process::Command;

    let Ok(output) = Command::new("scutil").arg("--proxy").output() else {
        return;
    };
    if !output.status.success() {
        return;
    }
    let Ok(proxy_info) = String::from_utf8(output.stdout) else {
        return;
    };

    // scutil 输出形如 "HTTPEnable : 1" / "HTTPProxy : 127.0.0.1" / "HTTPPort : 7890"
    let field = |name: &str| -> Option<String> {
        proxy_info
            .lines()
            .find(|l| l.trim().starts_with(name))
            .and_then(|l| l.split(':').nth(1))
            .map(|v| v.trim().to_string())
    };

    for (enable_key, host_key, port_key, scheme) in [
        ("HTTPEnable", "HTTPProxy", "HTTPPort", "http"),
        ("HTTPSEnable", "HTTPSProxy", "HTTPSPort", "https"),
    ] {
        let enabled = field(enable_key)
            .and_then(|v| v.parse::<i32>().ok())
            .unwrap_or(0);
        if enabled != 1 {
            continue;
        }

        if let (Some(host), Some(port)) = (field(host_key), field(port_key)) {
            set_proxy_env(scheme, &format!("http://{}:{}", host, port));
        }
    }
}

/// 配置系统代理（Windows）
///
/// 通过读取注册表获取系统代理设置，并设置相应的环境变量
#[cfg(target_os = "windows")]
pub fn setup_system_proxy_windows() {
    use winreg::enums::*;
    use winreg::RegKey;

    let hkcu = RegKey::predef(HKEY_CURRENT_USER);
    let Ok(internet_settings) =
        hkcu.open_subkey("Software\\Microsoft\\Windows\\CurrentVersion\\Internet Settings")
    else {
        warn!("无法读取 Windows 代理设置");
        return;
    };

    let proxy_enabled = internet_settings
        .get_value::<u32, _>("ProxyEnable")
        .map(|v| v == 1)
        .unwrap_or(false);
    if !proxy_enabled {
        info!("Windows 系统代理未启用");
        return;
    }

    let Ok(proxy_server) = internet_settings.get_value::<String, _>("ProxyServer") else {
        return;
    };
    info!("Windows 代理服务器配置: {}", proxy_server);

    let normalize = |addr: &str| -> String {
        if addr.starts_with("http://") {
            addr.to_string()
        } else {
            format!("http://{}", addr)
        }
    };

    // 代理服务器格式可能是：
    // 1. "host:port" (所有协议使用同一代理)
    // 2. "http=host:port;https=host:port" (不同协议使用不同代理)
    if proxy_server.contains('=') {
        for part in proxy_server.split(';') {
            if let Some((protocol, addr)) = part.split_once('=') {
                let scheme = protocol.trim().to_lowercase();
                set_proxy_env(&scheme, &normalize(addr.trim()));
            }
        }
    } else {
        let proxy_url = normalize(&proxy_server);
        set_proxy_env("http", &proxy_url);
        set_proxy_env("https", &proxy_url);
    }
}
