//! Contextual help and the simple accessibility actions.
//!
//! Sign-language and environment features are simulations: they answer with
//! canned text after a delay chosen by the runtime.

use crate::error::{Platform, SanadError};
use crate::location::Position;
use serde::{Deserialize, Serialize};

pub const SIGN_TRANSLATION_PENDING: &str = "جارٍ الترجمة باستخدام لغة الإشارة...";
pub const SIGN_TRANSLATION_DONE: &str = "🤲 تم الترجمة بنجاح - يمكنك متابعة المحادثة";
pub const ENVIRONMENT_PENDING: &str = "جارٍ التعرف على المحيط...";
pub const ENVIRONMENT_DONE: &str = "📸 تم التعرف على غرفة مكتبية بها طاولة ومكتب وكرسي";
pub const EMERGENCY_CALL: &str = "جاري الاتصال بخدمات الطوارئ";
pub const LISTENING_PROMPT: &str = "انتظار الأمر الصوتي...";
pub const DEVICE_LISTENING_PROMPT: &str = "انتظار الأمر الصوتي للتحكم بالأجهزة...";
pub const RECOGNITION_ERROR: &str = "حدث خطأ في التعرف على الصوت";
pub const VOICE_CONTROL_UNAVAILABLE: &str = "عذراً، التحكم الصوتي غير متاح";
pub const LOCATION_ERROR: &str = "خطأ في تحديد الموقع";

/// Which kind of support page the user is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportContext {
    Motor,
    Hearing,
    Visual,
}

impl SupportContext {
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "motor" => Some(Self::Motor),
            "hearing" => Some(Self::Hearing),
            "visual" => Some(Self::Visual),
            _ => None,
        }
    }
}

/// Tip for a support context; anything unknown gets the generic prompt
pub fn help_for(context: &str) -> &'static str {
    match SupportContext::from_label(context) {
        Some(SupportContext::Motor) => "نصائح للتحرك بسهولة وأمان",
        Some(SupportContext::Hearing) => "طرق التواصل الفعال باستخدام لغة الإشارة",
        Some(SupportContext::Visual) => "تقنيات للتعامل مع التحديات البصرية",
        None => "كيف يمكنني مساعدتك اليوم؟",
    }
}

/// Request for the speech-synthesis collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechRequest {
    pub text: String,
    pub language: String,
}

pub fn text_to_sign(text: &str) -> Result<String, SanadError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SanadError::EmptyInput("sign_text"));
    }
    Ok(format!("تم تحويل النص: \"{}\" إلى لغة الإشارة", text))
}

/// Validate text for read-aloud and build the synthesis request
pub fn read_text(text: &str, language: &str, synthesis_available: bool) -> Result<SpeechRequest, SanadError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(SanadError::EmptyInput("read_text"));
    }
    if !synthesis_available {
        return Err(SanadError::PlatformUnavailable(Platform::SpeechSynthesis));
    }
    Ok(SpeechRequest {
        text: text.to_string(),
        language: language.to_string(),
    })
}

pub fn voice_control_echo(command: &str) -> String {
    format!("تم استلام الأمر الصوتي: {}", command.trim())
}

pub fn share_location_message(result: &Result<Position, SanadError>) -> String {
    match result {
        Ok(position) => format!("تم مشاركة موقعك: {}", position),
        Err(SanadError::PlatformUnavailable(_)) => "خدمة تحديد الموقع غير متاحة".to_string(),
        Err(_) => LOCATION_ERROR.to_string(),
    }
}

/// Page-wide display toggles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayPreferences {
    pub high_contrast: bool,
    pub large_text: bool,
}

impl DisplayPreferences {
    /// Style classes the page body should carry
    pub fn classes(&self) -> Vec<&'static str> {
        let mut classes = Vec::new();
        if self.high_contrast {
            classes.push("high-contrast");
        }
        if self.large_text {
            classes.push("large-text");
        }
        classes
    }
}
