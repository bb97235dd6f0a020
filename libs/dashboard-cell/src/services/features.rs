// libs/dashboard-cell/src/services/features.rs
use shared_config::AppConfig;

use crate::models::{Banner, CallToAction, Feature, FeatureColor, FeaturesPage};

fn feature(
    icon: &'static str,
    title: &'static str,
    description: &'static str,
    benefits: [&'static str; 3],
    color: FeatureColor,
) -> Feature {
    Feature {
        icon,
        title,
        description,
        benefits: benefits.to_vec(),
        color,
        gradient: color.gradient(),
    }
}

/// Marketing content for the features page, two rows of three cards.
pub fn features_page(config: &AppConfig) -> FeaturesPage {
    FeaturesPage {
        hero: Banner {
            title: "Comprehensive Healthcare Features",
            subtitle: "Discover how NIRAMYA's advanced features are transforming healthcare \
                       access for rural communities across India.",
        },
        features: vec![
            feature(
                "video",
                "Video Consultation with Doctors",
                "Secure, high-quality video calls connecting rural patients with certified doctors across India.",
                ["24/7 Doctor availability", "Secure video streaming", "Consultation history"],
                FeatureColor::Blue,
            ),
            feature(
                "globe",
                "Multilingual Support",
                "Complete support for English, Hindi, and Punjabi to ensure comfortable communication.",
                ["Voice recognition in 3 languages", "Text translation", "Cultural sensitivity"],
                FeatureColor::Green,
            ),
            feature(
                "bot",
                "AI Symptom Checker",
                "Advanced AI chatbot for preliminary symptom assessment and medical triage.",
                ["Instant symptom analysis", "Emergency detection", "Treatment suggestions"],
                FeatureColor::Indigo,
            ),
            feature(
                "mic",
                "Voice-enabled Chatbot",
                "Natural voice interaction for users who prefer speaking over typing.",
                ["Voice commands", "Speech-to-text", "Accessibility friendly"],
                FeatureColor::Orange,
            ),
            feature(
                "scale",
                "Scalable Solution",
                "Built to serve millions of rural users across India with cloud infrastructure.",
                ["Cloud-based architecture", "Auto-scaling", "High availability"],
                FeatureColor::Teal,
            ),
            feature(
                "shield",
                "Secure & Compliant",
                "HIPAA compliant platform with end-to-end encryption for patient privacy.",
                ["End-to-end encryption", "HIPAA compliance", "Data privacy"],
                FeatureColor::Pink,
            ),
        ],
        call_to_action: CallToAction {
            title: "Experience the Future of Healthcare",
            subtitle: "Join thousands of patients and healthcare providers who are already \
                       benefiting from NIRAMYA's innovative telemedicine platform.",
            label: "Get Started Today",
            url: config.get_started_url.clone(),
        },
    }
}
