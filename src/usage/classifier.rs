// 应用分类器 - 根据包名把应用归入类别

use crate::models::AppCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 分类规则 - 社交媒体包名集合与关键词列表
///
/// 作为配置注入而非硬编码静态集合，测试和用户自定义都能替换
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRules {
    /// 社交媒体应用包名（精确匹配）
    pub social_media_packages: HashSet<String>,
    /// 效率工具关键词（子串匹配）
    pub productivity_keywords: Vec<String>,
    /// 娱乐应用关键词（子串匹配）
    pub entertainment_keywords: Vec<String>,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self {
            social_media_packages: [
                "com.instagram.android",
                "com.facebook.katana",
                "com.facebook.orca",
                "com.twitter.android",
                "com.zhiliaoapp.musically", // TikTok
                "com.snapchat.android",
                "com.whatsapp",
                "com.whatsapp.w4b",
                "org.telegram.messenger",
                "com.reddit.frontpage",
                "com.google.android.youtube",
                "com.google.android.apps.youtube.music",
                "com.twitter.android.lite",
                "com.facebook.lite",
                "com.facebook.mlite",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            productivity_keywords: ["office", "productivity", "notes", "calendar", "gmail", "drive"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            entertainment_keywords: ["game", "entertainment", "netflix", "spotify", "music", "video"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl CategoryRules {
    /// 按包名分类应用，规则按顺序匹配，首个命中生效：
    /// 精确社交集合 > 效率关键词 > 娱乐关键词 > 其他
    ///
    /// 关键词是子串启发式，误判是已知的可接受限制
    pub fn classify(&self, package_id: &str) -> AppCategory {
        if self.social_media_packages.contains(package_id) {
            return AppCategory::SocialMedia;
        }
        if self
            .productivity_keywords
            .iter()
            .any(|kw| package_id.contains(kw.as_str()))
        {
            return AppCategory::Productivity;
        }
        if self
            .entertainment_keywords
            .iter()
            .any(|kw| package_id.contains(kw.as_str()))
        {
            return AppCategory::Entertainment;
        }
        AppCategory::Others
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_social_media_exact_match() {
        let rules = CategoryRules::default();
        assert_eq!(
            rules.classify("com.instagram.android"),
            AppCategory::SocialMedia
        );
        assert_eq!(
            rules.classify("com.zhiliaoapp.musically"),
            AppCategory::SocialMedia
        );
    }

    #[test]
    fn test_productivity_keywords() {
        let rules = CategoryRules::default();
        assert_eq!(
            rules.classify("com.google.android.gm.gmail"),
            AppCategory::Productivity
        );
        assert_eq!(
            rules.classify("com.microsoft.office.word"),
            AppCategory::Productivity
        );
    }

    #[test]
    fn test_entertainment_keywords() {
        let rules = CategoryRules::default();
        assert_eq!(rules.classify("com.netflix.mediaclient"), AppCategory::Entertainment);
        assert_eq!(rules.classify("com.supercell.game.clash"), AppCategory::Entertainment);
    }

    #[test]
    fn test_rule_order_social_wins_over_keywords() {
        // YouTube Music 同时命中社交集合和 music 关键词，精确集合优先
        let rules = CategoryRules::default();
        assert_eq!(
            rules.classify("com.google.android.apps.youtube.music"),
            AppCategory::SocialMedia
        );
    }

    #[test]
    fn test_unknown_package_defaults_to_others() {
        let rules = CategoryRules::default();
        assert_eq!(rules.classify("com.unknown.randomapp"), AppCategory::Others);
    }

    #[test]
    fn test_custom_rules_substitution() {
        let rules = CategoryRules {
            social_media_packages: ["com.example.chat".to_string()].into_iter().collect(),
            productivity_keywords: vec!["work".to_string()],
            entertainment_keywords: vec![],
        };
        assert_eq!(rules.classify("com.example.chat"), AppCategory::SocialMedia);
        assert_eq!(rules.classify("com.example.workbench"), AppCategory::Productivity);
        assert_eq!(rules.classify("com.netflix.mediaclient"), AppCategory::Others);
    }
}
