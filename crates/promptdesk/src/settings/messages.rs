//! Localized page copy and toast texts.

use std::fmt;
use std::str::FromStr;

/// Language of the page copy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    Zh,
    En,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zh" | "zh-cn" | "zh_cn" => Ok(Self::Zh),
            "en" | "en-us" | "en_us" => Ok(Self::En),
            other => Err(format!("unsupported locale '{other}' (expected zh or en)")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Zh => "zh",
            Self::En => "en",
        })
    }
}

/// Title and description of one toast.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Notice {
    pub title: &'static str,
    pub description: &'static str,
}

/// Every user-visible string on the settings page.
#[derive(Clone, Copy, Debug)]
pub struct Messages {
    pub heading: &'static str,
    pub intro: &'static str,
    pub placeholder: &'static str,
    pub save_label: &'static str,
    pub reset_label: &'static str,

    pub load_failed: Notice,
    pub save_succeeded: Notice,
    pub save_failed: Notice,
    pub reset_succeeded: Notice,
    pub reset_failed: Notice,
    pub not_logged_in: Notice,
}

impl Messages {
    pub fn for_locale(locale: Locale) -> &'static Messages {
        match locale {
            Locale::Zh => &ZH,
            Locale::En => &EN,
        }
    }
}

static ZH: Messages = Messages {
    heading: "自定义提示词",
    intro: "自定义 AI 助手的提示词，以获得更好的对话效果。如果不设置，将使用系统默认提示词。",
    placeholder: "输入自定义提示词...",
    save_label: "保存",
    reset_label: "重置为默认",
    load_failed: Notice {
        title: "获取提示词失败",
        description: "请稍后重试",
    },
    save_succeeded: Notice {
        title: "保存成功",
        description: "提示词已更新",
    },
    save_failed: Notice {
        title: "保存失败",
        description: "请稍后重试",
    },
    reset_succeeded: Notice {
        title: "重置成功",
        description: "提示词已恢复默认",
    },
    reset_failed: Notice {
        title: "重置失败",
        description: "请稍后重试",
    },
    not_logged_in: Notice {
        title: "未登录",
        description: "请先登录后再试",
    },
};

static EN: Messages = Messages {
    heading: "Custom prompt",
    intro: "Customize the AI assistant's prompt for better conversations. \
            If left empty, the system default prompt is used.",
    placeholder: "Enter a custom prompt...",
    save_label: "Save",
    reset_label: "Reset to default",
    load_failed: Notice {
        title: "Failed to load prompt",
        description: "Please try again later",
    },
    save_succeeded: Notice {
        title: "Saved",
        description: "Prompt updated",
    },
    save_failed: Notice {
        title: "Save failed",
        description: "Please try again later",
    },
    reset_succeeded: Notice {
        title: "Reset",
        description: "Prompt restored to default",
    },
    reset_failed: Notice {
        title: "Reset failed",
        description: "Please try again later",
    },
    not_logged_in: Notice {
        title: "Not logged in",
        description: "Please log in and try again",
    },
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_parses_case_insensitively() {
        assert_eq!("EN".parse::<Locale>(), Ok(Locale::En));
        assert_eq!("zh-CN".parse::<Locale>(), Ok(Locale::Zh));
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn default_locale_is_chinese() {
        let messages = Messages::for_locale(Locale::default());
        assert_eq!(messages.save_label, "保存");
        assert_eq!(messages.not_logged_in.title, "未登录");
    }

    #[test]
    fn failures_share_the_retry_description() {
        for locale in [Locale::Zh, Locale::En] {
            let m = Messages::for_locale(locale);
            assert_eq!(m.load_failed.description, m.save_failed.description);
            assert_eq!(m.save_failed.description, m.reset_failed.description);
        }
    }
}
