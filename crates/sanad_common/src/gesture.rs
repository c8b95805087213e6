//! Gesture translation - spoken command to a canned sign animation.
//!
//! Resolution is the ordered first-match scan shared with the intent
//! classifier. Each label deterministically selects one message and one set
//! of animation directives for the graphics layer. Nothing is remembered
//! between calls.

use crate::keywords::{KeywordEntry, KeywordTable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GestureLabel {
    Greeting,
    Farewell,
    Pointing,
    Stop,
    Agreement,
    Disagreement,
    HelpRequest,
    WalkingTutorial,
    WalkingDemo,
    Default,
}

impl std::fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Greeting => "greeting",
            Self::Farewell => "farewell",
            Self::Pointing => "pointing",
            Self::Stop => "stop",
            Self::Agreement => "agreement",
            Self::Disagreement => "disagreement",
            Self::HelpRequest => "help-request",
            Self::WalkingTutorial => "walking-tutorial",
            Self::WalkingDemo => "walking-demo",
            Self::Default => "default",
        };
        write!(f, "{}", s)
    }
}

const GESTURE_KEYWORDS: &[KeywordEntry<GestureLabel>] = &[
    (GestureLabel::Greeting, &["مرحبا", "أهلا"]),
    (GestureLabel::Farewell, &["وداعا"]),
    (GestureLabel::Pointing, &["اتصال"]),
    (GestureLabel::Stop, &["توقف"]),
    (GestureLabel::Agreement, &["نعم"]),
    (GestureLabel::Disagreement, &["لا"]),
    (GestureLabel::HelpRequest, &["مساعدة"]),
    (GestureLabel::WalkingTutorial, &["كيف أمشي", "طريقة المشي"]),
    (GestureLabel::WalkingDemo, &["مشي", "المشي"]),
];

pub const GESTURE_TABLE: KeywordTable<GestureLabel> =
    KeywordTable::new(GESTURE_KEYWORDS, GestureLabel::Default);

/// Parts of the hand figure the graphics layer can address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Element {
    HandGroup,
    Arm,
    Hand,
}

/// One instruction for the graphics layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnimationDirective {
    /// Cancel whatever animation is running on the hand group
    Stop,
    /// Start a named keyframe animation on the hand group
    Play {
        name: &'static str,
        duration_ms: u32,
        infinite: bool,
    },
    /// Write a static attribute on one element
    SetAttribute {
        element: Element,
        attribute: &'static str,
        value: &'static str,
    },
}

impl AnimationDirective {
    fn play(name: &'static str, duration_ms: u32) -> Self {
        Self::Play {
            name,
            duration_ms,
            infinite: false,
        }
    }

    fn looped(name: &'static str, duration_ms: u32) -> Self {
        Self::Play {
            name,
            duration_ms,
            infinite: true,
        }
    }

    fn set(element: Element, attribute: &'static str, value: &'static str) -> Self {
        Self::SetAttribute {
            element,
            attribute,
            value,
        }
    }
}

impl std::fmt::Display for AnimationDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stop => write!(f, "animation: none"),
            Self::Play {
                name,
                duration_ms,
                infinite,
            } => {
                write!(f, "animation: {} {}ms", name, duration_ms)?;
                if *infinite {
                    write!(f, " infinite")?;
                }
                Ok(())
            }
            Self::SetAttribute {
                element,
                attribute,
                value,
            } => write!(f, "{:?}.{} = {}", element, attribute, value),
        }
    }
}

/// Message plus directives for one translated command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GestureResponse {
    pub label: GestureLabel,
    pub message: String,
    /// Always starts with [`AnimationDirective::Stop`]: a fresh command
    /// resets the previous animation before anything else.
    pub directives: Vec<AnimationDirective>,
}

const WALK_TUTORIAL_TEXT: &str = "دليل المشي:\n\
1. حافظ على توازنك\n\
2. ضع الوزن بالتساوي على القدمين\n\
3. استخدم المساعدات المناسبة إذا لزم الأمر";

const WALK_DEMO_TEXT: &str = "حركات المشي:\nتم ترجمة الحركة: مشي متوازن وثابت";

const WALK_TUTORIAL_PATH: &str = "M150,100 Q180,130 150,160 Q120,190 150,220";
const WALK_DEMO_PATH: &str = "M150,100 Q180,130 150,160 Q120,190 150,220 Q180,250 150,280";

#[derive(Debug, Clone, Copy)]
pub struct GestureResolver {
    table: KeywordTable<GestureLabel>,
}

impl Default for GestureResolver {
    fn default() -> Self {
        Self {
            table: GESTURE_TABLE,
        }
    }
}

impl GestureResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&self, command: &str) -> GestureLabel {
        self.table.classify(command)
    }

    /// Resolve and render the full response for `command`.
    pub fn translate(&self, command: &str) -> GestureResponse {
        let label = self.resolve(command);
        let (message, extra) = render(label, command);
        let mut directives = Vec::with_capacity(extra.len() + 1);
        directives.push(AnimationDirective::Stop);
        directives.extend(extra);

        GestureResponse {
            label,
            message,
            directives,
        }
    }
}

fn render(label: GestureLabel, command: &str) -> (String, Vec<AnimationDirective>) {
    use AnimationDirective as A;

    match label {
        GestureLabel::Greeting | GestureLabel::Farewell => (
            "تم تنفيذ حركة التحية".to_string(),
            vec![A::looped("handWave", 1000)],
        ),
        GestureLabel::Pointing => (
            format!("الإشارة إلى: {}", command),
            vec![A::play("pointGesture", 500)],
        ),
        GestureLabel::Stop => (
            "إيقاف الحركة".to_string(),
            vec![A::set(Element::Arm, "stroke", "#e74c3c")],
        ),
        GestureLabel::Agreement => (
            "إشارة الموافقة".to_string(),
            vec![A::set(Element::Hand, "fill", "#2ecc71")],
        ),
        GestureLabel::Disagreement => (
            "إشارة الرفض".to_string(),
            vec![A::set(Element::Hand, "fill", "#e74c3c")],
        ),
        GestureLabel::HelpRequest => (
            "رفع اليد طلباً للمساعدة".to_string(),
            vec![A::play("raiseHand", 1000)],
        ),
        GestureLabel::WalkingTutorial => (
            WALK_TUTORIAL_TEXT.to_string(),
            vec![
                A::set(Element::Arm, "d", WALK_TUTORIAL_PATH),
                A::set(Element::Hand, "cy", "220"),
                A::looped("walkingAnimation", 2000),
            ],
        ),
        GestureLabel::WalkingDemo => (
            WALK_DEMO_TEXT.to_string(),
            vec![
                A::set(Element::Arm, "d", WALK_DEMO_PATH),
                A::set(Element::Hand, "cy", "280"),
                A::looped("dynamicWalkingMotion", 3000),
            ],
        ),
        GestureLabel::Default => (format!("تم استلام الأمر: {}", command), vec![]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_waves() {
        let r = GestureResolver::new().translate("مرحبا بك");
        assert_eq!(r.label, GestureLabel::Greeting);
        assert_eq!(r.directives[0], AnimationDirective::Stop);
        assert!(matches!(
            r.directives[1],
            AnimationDirective::Play { name: "handWave", infinite: true, .. }
        ));
    }

    #[test]
    fn test_farewell_shares_wave() {
        let r = GestureResolver::new().translate("وداعا يا صديقي");
        assert_eq!(r.label, GestureLabel::Farewell);
        assert_eq!(r.message, "تم تنفيذ حركة التحية");
    }

    #[test]
    fn test_pointing_echoes_command() {
        let r = GestureResolver::new().translate("اتصال بأخي");
        assert_eq!(r.label, GestureLabel::Pointing);
        assert_eq!(r.message, "الإشارة إلى: اتصال بأخي");
    }

    #[test]
    fn test_greeting_before_disagreement() {
        // "أهلا" ends with "لا", greeting is earlier in the table
        assert_eq!(GestureResolver::new().resolve("أهلا"), GestureLabel::Greeting);
    }

    #[test]
    fn test_walking_tutorial_before_demo() {
        let resolver = GestureResolver::new();
        assert_eq!(resolver.resolve("كيف أمشي بأمان"), GestureLabel::WalkingTutorial);
        assert_eq!(resolver.resolve("أريد المشي"), GestureLabel::WalkingDemo);
    }

    #[test]
    fn test_walking_tutorial_moves_hand() {
        let r = GestureResolver::new().translate("طريقة المشي");
        assert!(r.directives.contains(&AnimationDirective::SetAttribute {
            element: Element::Hand,
            attribute: "cy",
            value: "220",
        }));
        assert!(r.message.starts_with("دليل المشي"));
    }

    #[test]
    fn test_default_echoes_and_cancels() {
        let r = GestureResolver::new().translate("شيء آخر");
        assert_eq!(r.label, GestureLabel::Default);
        assert_eq!(r.message, "تم استلام الأمر: شيء آخر");
        assert_eq!(r.directives, vec![AnimationDirective::Stop]);
    }

    #[test]
    fn test_directive_display() {
        let d = AnimationDirective::Play {
            name: "raiseHand",
            duration_ms: 1000,
            infinite: false,
        };
        assert_eq!(d.to_string(), "animation: raiseHand 1000ms");
    }
}
