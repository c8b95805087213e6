//! Error types for Sanad.

use std::fmt;
use thiserror::Error;

/// Platform services that may be missing on the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    SpeechRecognition,
    SpeechSynthesis,
    Geolocation,
    Audio,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SpeechRecognition => "speech_recognition",
            Self::SpeechSynthesis => "speech_synthesis",
            Self::Geolocation => "geolocation",
            Self::Audio => "audio",
        };
        write!(f, "{}", s)
    }
}

#[derive(Error, Debug)]
pub enum SanadError {
    #[error("Device already registered: {0}")]
    DuplicateDevice(String),

    #[error("Index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Required field is empty: {0}")]
    EmptyInput(&'static str),

    #[error("Unknown device type: {0}")]
    UnknownDeviceType(String),

    #[error("Unknown input surface: {0}")]
    UnknownSurface(String),

    #[error("Platform service unavailable: {0}")]
    PlatformUnavailable(Platform),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("External collaborator failed: {0}")]
    External(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl SanadError {
    pub fn code(&self) -> i32 {
        match self {
            SanadError::DuplicateDevice(_) => -32010,
            SanadError::IndexOutOfRange { .. } => -32011,
            SanadError::EmptyInput(_) => -32012,
            SanadError::UnknownDeviceType(_) => -32013,
            SanadError::UnknownSurface(_) => -32014,
            SanadError::PlatformUnavailable(_) => -32020,
            SanadError::ProfileNotFound(_) => -32015,
            SanadError::External(_) => -32030,
            SanadError::Io(_) => -32006,
            SanadError::TomlParse(_) => -32700,
        }
    }

    /// Message suitable for the on-screen status area.
    pub fn user_message(&self) -> String {
        match self {
            SanadError::DuplicateDevice(_) => "هذا الجهاز مسجل بالفعل".to_string(),
            SanadError::IndexOutOfRange { index, .. } => {
                format!("لا يوجد عنصر بالرقم {}", index + 1)
            }
            SanadError::EmptyInput(field) => match *field {
                "sign_text" => "يرجى إدخال نص للترجمة".to_string(),
                "read_text" => "يرجى إدخال نص للقراءة".to_string(),
                "device_id" => "يرجى إدخال معرف الجهاز واختيار نوعه".to_string(),
                "contact_name" | "contact_phone" => "يرجى إدخال اسم ورقم جهة الاتصال".to_string(),
                _ => "يرجى تعبئة الحقول المطلوبة".to_string(),
            },
            SanadError::UnknownDeviceType(_) => "يرجى إدخال معرف الجهاز واختيار نوعه".to_string(),
            SanadError::UnknownSurface(name) => format!("أمر غير مفهوم: {}", name),
            SanadError::PlatformUnavailable(Platform::SpeechRecognition) => {
                "التعرف الصوتي غير مدعوم".to_string()
            }
            SanadError::PlatformUnavailable(Platform::SpeechSynthesis) => {
                "عذراً، خدمة التحويل الصوتي غير متاحة".to_string()
            }
            SanadError::PlatformUnavailable(Platform::Geolocation) => {
                "خدمة تحديد الموقع غير متاحة".to_string()
            }
            SanadError::PlatformUnavailable(Platform::Audio) => "الصوت غير متاح".to_string(),
            SanadError::ProfileNotFound(id) => format!("الملف الشخصي غير موجود: {}", id),
            SanadError::External(_) | SanadError::Io(_) | SanadError::TomlParse(_) => {
                "حدث خطأ غير متوقع".to_string()
            }
        }
    }
}
