// ==========================================
// 国际化 (i18n) - 面向用户的导入错误提示
// ==========================================
// 文案位于 locales/app.yml,zh-CN 为回退语言
// rust_i18n::i18n! 宏在 lib.rs 中初始化
// ==========================================

/// 已提供文案的语言
pub const SUPPORTED_LOCALES: [&str; 2] = ["zh-CN", "en"];

/// 切换全局语言,未提供文案的语言代码返回 false 且保持原设置
pub fn set_locale(locale: &str) -> bool {
    if !SUPPORTED_LOCALES.contains(&locale) {
        return false;
    }
    rust_i18n::set_locale(locale);
    true
}

/// 按 key 取当前语言文案,并替换 %{name} 占位符
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter()
        .fold(rust_i18n::t!(key).to_string(), |text, (name, value)| {
            text.replace(&format!("%{{{}}}", name), value)
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    // locale 为全局状态,涉及语言切换的测试需串行
    pub(crate) static LOCALE_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_unsupported_locale_is_ignored() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        assert!(set_locale("en"));
        assert!(!set_locale("fr"));
        assert_eq!(rust_i18n::locale().to_string(), "en");
        set_locale("zh-CN");
    }

    #[test]
    fn test_placeholders_per_locale() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap();
        set_locale("en");
        let msg = t_with_args(
            "import.missing_section",
            &[("expected", "Positions / Позиции")],
        );
        assert!(msg.contains("Positions / Позиции"));
        assert!(!msg.contains("%{"));

        set_locale("zh-CN");
        let msg = t_with_args("import.unrecognized_container", &[("file", "a.xlsx")]);
        assert!(msg.contains("a.xlsx"));
        assert!(msg.contains("重新"));
    }
}
