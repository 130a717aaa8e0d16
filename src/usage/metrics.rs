// 指标服务 - 在聚合结果之上计算派生指标

use crate::models::{AppCategory, AppUsageInfo};

/// 总屏幕时间：所有保留应用的时长之和
pub fn total_screen_time(apps: &[AppUsageInfo]) -> i64 {
    apps.iter().map(|app| app.total_foreground_millis).sum()
}

/// 某个类别的使用总时长
pub fn category_time(apps: &[AppUsageInfo], category: AppCategory) -> i64 {
    apps.iter()
        .filter(|app| app.category == category)
        .map(|app| app.total_foreground_millis)
        .sum()
}

/// 使用时长前 n 的应用，按时长降序排列
///
/// 时长相同时按包名升序，保证排名跨运行稳定可复现
pub fn top_apps(apps: &[AppUsageInfo], n: usize) -> Vec<AppUsageInfo> {
    let mut sorted: Vec<AppUsageInfo> = apps.to_vec();
    sorted.sort_by(|a, b| {
        b.total_foreground_millis
            .cmp(&a.total_foreground_millis)
            .then_with(|| a.package_id.cmp(&b.package_id))
    });
    sorted.truncate(n);
    sorted
}

/// 把毫秒时长格式化为可读文本，如 "2h 30m"
///
/// 各单位只做整数截断，不四舍五入
pub fn format_duration(millis: i64) -> String {
    let total_seconds = millis / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;

    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", total_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(pkg: &str, millis: i64, category: AppCategory) -> AppUsageInfo {
        AppUsageInfo {
            package_id: pkg.to_string(),
            display_name: pkg.to_string(),
            total_foreground_millis: millis,
            category,
        }
    }

    #[test]
    fn test_total_equals_sum_over_categories() {
        let apps = vec![
            app("com.a", 100_000, AppCategory::SocialMedia),
            app("com.b", 200_000, AppCategory::Productivity),
            app("com.c", 300_000, AppCategory::Entertainment),
            app("com.d", 400_000, AppCategory::Others),
        ];
        let by_category: i64 = AppCategory::ALL
            .iter()
            .map(|c| category_time(&apps, *c))
            .sum();
        assert_eq!(total_screen_time(&apps), by_category);
        assert_eq!(total_screen_time(&apps), 1_000_000);
    }

    #[test]
    fn test_category_time_filters() {
        let apps = vec![
            app("com.a", 100_000, AppCategory::SocialMedia),
            app("com.b", 250_000, AppCategory::SocialMedia),
            app("com.c", 300_000, AppCategory::Others),
        ];
        assert_eq!(category_time(&apps, AppCategory::SocialMedia), 350_000);
        assert_eq!(category_time(&apps, AppCategory::Entertainment), 0);
    }

    #[test]
    fn test_top_apps_sorted_and_truncated() {
        let apps = vec![
            app("com.a", 120_000, AppCategory::Others),
            app("com.b", 200_000, AppCategory::Others),
            app("com.c", 90_000, AppCategory::Others),
        ];
        let top = top_apps(&apps, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].package_id, "com.b");
        assert_eq!(top[1].package_id, "com.a");
    }

    #[test]
    fn test_top_apps_tie_broken_by_package_id() {
        let apps = vec![
            app("com.zebra", 100_000, AppCategory::Others),
            app("com.alpha", 100_000, AppCategory::Others),
        ];
        let top = top_apps(&apps, 2);
        assert_eq!(top[0].package_id, "com.alpha");
        assert_eq!(top[1].package_id, "com.zebra");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(45_000), "45s");
        assert_eq!(format_duration(90_000), "1m");
        assert_eq!(format_duration(7_260_000), "2h 1m");
        assert_eq!(format_duration(3_600_000), "1h 0m");
    }
}
