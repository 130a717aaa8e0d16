// 使用事件聚合器 - 将前台/后台切换事件配对为每个应用的前台时长

use crate::models::{EventKind, UsageEvent};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// 聚合规则 - 排除集与最小时长阈值
///
/// 以显式参数注入而非全局静态集合，方便测试时替换规则
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationRules {
    /// 本应用自身的包名（统计结果中排除自己）
    pub self_package: String,
    /// 始终排除的系统包名（启动器、系统UI等）
    pub excluded_packages: HashSet<String>,
    /// 最小使用时长（毫秒），低于此值视为瞬时唤醒噪音
    pub min_usage_millis: i64,
}

impl Default for AggregationRules {
    fn default() -> Self {
        Self {
            self_package: "com.wellbeing.analyzer".to_string(),
            excluded_packages: [
                "android",
                "com.android.systemui",
                "com.android.launcher",
                "com.android.launcher3",
                "com.google.android.permissioncontroller",
                "com.android.providers.settings",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            min_usage_millis: 60_000,
        }
    }
}

/// 一次聚合的输出：包名到前台总时长的映射，加上坏事件计数
#[derive(Debug, Clone, Default)]
pub struct AggregationOutcome {
    /// 包名 -> 累计前台时长（毫秒，恒为正）
    pub totals: HashMap<String, i64>,
    /// 缺少包名而被跳过的事件数量
    pub skipped_malformed: usize,
}

/// 把按时间顺序排列的前台/后台事件流配对成每个应用的前台总时长
///
/// 配对规则：
/// 1. FOREGROUND 事件在没有未关闭区间时开启新区间；
///    已有未关闭区间时保留原起点（重复的前台信号直接忽略，
///    避免虚增时长）
/// 2. BACKGROUND 事件关闭对应的未关闭区间，时长为正才累加；
///    没有未关闭区间的 BACKGROUND 事件无法归属时长，忽略
/// 3. 事件流耗尽后，仍未关闭的区间按 window_end 收口
///    （对应查询时刻还在前台的应用）
///
/// 时钟异常（非正时长）直接丢弃，绝不做减法
pub fn aggregate(
    events: &[UsageEvent],
    window_end: i64,
    rules: &AggregationRules,
) -> AggregationOutcome {
    // 每个包当前未关闭区间的起点
    let mut open_starts: HashMap<&str, i64> = HashMap::new();
    let mut totals: HashMap<String, i64> = HashMap::new();
    let mut skipped_malformed = 0usize;

    for event in events {
        if event.package_id.is_empty() {
            // 缺少包名的坏记录，跳过但不中断整个聚合
            skipped_malformed += 1;
            continue;
        }

        match event.kind {
            EventKind::Foreground => {
                // 保留首个前台起点，重复的前台事件忽略
                open_starts
                    .entry(event.package_id.as_str())
                    .or_insert(event.timestamp);
            }
            EventKind::Background => {
                if let Some(start) = open_starts.remove(event.package_id.as_str()) {
                    let duration = event.timestamp - start;
                    if duration > 0 {
                        *totals.entry(event.package_id.clone()).or_insert(0) += duration;
                    }
                }
            }
        }
    }

    // 查询时刻仍在前台的应用，按窗口终点收口
    for (package, start) in open_starts {
        let duration = window_end - start;
        if duration > 0 {
            *totals.entry(package.to_string()).or_insert(0) += duration;
        }
    }

    // 过滤：自身包、排除集、低于最小时长的噪音
    totals.retain(|package, total| {
        package != &rules.self_package
            && !rules.excluded_packages.contains(package)
            && *total >= rules.min_usage_millis
    });

    debug!(
        "聚合完成: {} 个应用有前台时长, 跳过 {} 条坏事件",
        totals.len(),
        skipped_malformed
    );

    AggregationOutcome {
        totals,
        skipped_malformed,
    }
}
