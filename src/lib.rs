// 数字健康分析器 - Tauri应用主库

// 声明模块
pub mod assistant;
pub mod commands;
pub mod emotion;
pub mod event_bus;
pub mod logger;
pub mod models;
pub mod notify;
pub mod settings;
pub mod usage;

use std::sync::Arc;
use std::time::Duration;
use tauri::Manager;
use tracing::{info, warn};

use assistant::AssistantManager;
use commands::*;
use emotion::EmotionDetector;
use event_bus::{AppEvent, EventBus};
use notify::AlertDispatcher;
use settings::SettingsManager;
use usage::source::EventLog;
use usage::UsageCollector;

/// 应用状态
///
/// 所有组件在启动时构建一次，命令通过状态共享：
/// - 设置管理器：JSON配置文件的读写
/// - 事件日志：进程内使用事件源
/// - 收集器：事件源 + 聚合器 + 分类器的组合
/// - 助手/情绪客户端：共享同一个HTTP连接池
/// - 事件总线：模块间解耦通信
#[derive(Clone)]
pub struct AppState {
    /// 设置管理器
    pub settings: Arc<SettingsManager>,
    /// 使用事件日志（事件源实现）
    pub event_log: Arc<EventLog>,
    /// 使用统计收集器
    pub collector: Arc<UsageCollector>,
    /// 健康助手
    pub assistant: Arc<AssistantManager>,
    /// 情绪识别客户端
    pub emotion: Arc<EmotionDetector>,
    /// 告警分发器
    pub alerts: Arc<AlertDispatcher>,
    /// 事件总线
    pub event_bus: Arc<EventBus>,
    /// 日志推送器
    pub log_broadcaster: Arc<logger::LogBroadcaster>,
}

pub fn run() {
    // 创建日志广播器
    let log_broadcaster = Arc::new(logger::LogBroadcaster::new());

    // 初始化日志系统（带前端推送功能）
    logger::init_with_broadcaster(log_broadcaster.clone()).expect("Failed to initialize logger");

    tauri::Builder::default()
        .setup(move |app| {
            info!("初始化数字健康分析器...");

            log_broadcaster.set_app_handle(app.handle().clone());

            let app_dir = app.path().app_data_dir()?;

            let state = tauri::async_runtime::block_on(async {
                // 先初始化设置管理器，以便读取日志和告警配置
                let settings = Arc::new(
                    SettingsManager::new(app_dir.join("config.json"))
                        .await
                        .expect("设置管理器初始化失败"),
                );

                let initial_config = settings.get().await;
                log_broadcaster
                    .set_enabled(initial_config.logger_settings.enable_frontend_logging);
                info!(
                    "配置已加载, 告警阈值: {}ms",
                    initial_config.alert_threshold_millis
                );

                // 共享HTTP客户端，两个API客户端复用连接池
                let http_client = reqwest::Client::builder()
                    .timeout(Duration::from_secs(30))
                    .build()
                    .expect("HTTP客户端初始化失败");

                let event_bus = Arc::new(EventBus::new(100));
                let event_log = Arc::new(EventLog::new());
                let collector = Arc::new(UsageCollector::new(event_log.clone()));
                let assistant = Arc::new(AssistantManager::new(http_client.clone()));
                let emotion = Arc::new(EmotionDetector::new(http_client));
                let alerts = Arc::new(AlertDispatcher::new(event_bus.clone()));

                AppState {
                    settings,
                    event_log,
                    collector,
                    assistant,
                    emotion,
                    alerts,
                    event_bus,
                    log_broadcaster: log_broadcaster.clone(),
                }
            });

            // 后台任务：把总线上的关键事件写入日志
            {
                let mut receiver = state.event_bus.subscribe();
                tauri::async_runtime::spawn(async move {
                    loop {
                        match receiver.recv().await {
                            Ok(AppEvent::UsageAlertTriggered { alert }) => {
                                warn!("使用告警: {}", alert.message);
                            }
                            Ok(AppEvent::EmotionDetected { top_emotion, score }) => {
                                info!("情绪识别结果: {} ({:.0}%)", top_emotion, score * 100.0);
                            }
                            Ok(_) => {}
                            Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                            Err(_) => {}
                        }
                    }
                });
            }

            app.manage(state);
            info!("数字健康分析器初始化完成");
            Ok(())
        })
        .plugin(tauri_plugin_opener::init())
        .invoke_handler(tauri::generate_handler![
            record_usage_event,
            record_usage_events,
            register_app,
            set_usage_permission,
            clear_usage_events,
            get_usage_snapshot,
            get_usage_overview,
            get_category_times,
            format_millis,
            send_chat_message,
            test_assistant_api,
            analyze_emotion,
            test_emotion_api,
            get_app_config,
            update_config,
            get_api_key_status,
            get_log_dir,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
