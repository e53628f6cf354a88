//! Marketing home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;

// =============================================================================
// Static marketing content
// =============================================================================

/// Headline block at the top of the page.
pub struct HeroContent {
    pub title: String,
    pub highlight: String,
    pub subtitle: String,
    pub primary_cta: Cta,
    pub secondary_cta: Cta,
}

/// A call-to-action link.
pub struct Cta {
    pub text: String,
    pub href: String,
}

/// One card in the features grid.
pub struct Feature {
    pub icon: String,
    pub title: String,
    pub description: String,
}

/// One step of the "how it works" walkthrough.
pub struct Step {
    pub number: u8,
    pub title: String,
    pub description: String,
}

/// One audience tab in the benefits section.
pub struct BenefitGroup {
    pub title: String,
    pub benefits: Vec<String>,
}

impl Default for HeroContent {
    fn default() -> Self {
        Self {
            title: "Attendance Tracking".to_owned(),
            highlight: "Reimagined".to_owned(),
            subtitle: "Say goodbye to clunky, outdated systems. TRACKZONE combines GPS \
                       tracking and fingerprint authentication for seamless, secure, and \
                       reliable attendance management."
                .to_owned(),
            primary_cta: Cta {
                text: "Get Started".to_owned(),
                href: "/login-selector".to_owned(),
            },
            secondary_cta: Cta {
                text: "Explore Features".to_owned(),
                href: "#features".to_owned(),
            },
        }
    }
}

fn features() -> Vec<Feature> {
    let content = [
        (
            "\u{1f4cd}",
            "GPS Tracking",
            "Automatically mark attendance when employees enter geofenced work areas.",
        ),
        (
            "\u{1f446}",
            "Fingerprint Authentication",
            "Eliminate buddy punching with biometric verification for foolproof attendance.",
        ),
        (
            "\u{1f514}",
            "Real-time Notifications",
            "Keep everyone updated with instant alerts for check-ins, reminders, and more.",
        ),
        (
            "\u{1f4b0}",
            "Payroll Integration",
            "Seamlessly connect attendance data with your payroll system for accurate payments.",
        ),
        (
            "\u{1f5d3}\u{fe0f}",
            "Leave Management",
            "Manage leave requests, approvals, and balances in one unified platform.",
        ),
        (
            "\u{1f4ca}",
            "Analytics Dashboard",
            "Gain insights into attendance patterns with comprehensive reports and visualizations.",
        ),
    ];
    content
        .into_iter()
        .map(|(icon, title, description)| Feature {
            icon: icon.to_owned(),
            title: title.to_owned(),
            description: description.to_owned(),
        })
        .collect()
}

fn steps() -> Vec<Step> {
    let content = [
        (
            "Geofence Setup",
            "Define your workplace boundaries with precision GPS geofencing technology.",
        ),
        (
            "Employee Registration",
            "Register employee fingerprints and profiles in the secure TRACKZONE system.",
        ),
        (
            "Automated Check-in",
            "Employees are detected when they enter the geofenced area and prompted to verify.",
        ),
        (
            "Fingerprint Verification",
            "A quick fingerprint scan confirms identity and marks attendance in real-time.",
        ),
        (
            "Real-time Monitoring",
            "Managers can view attendance status and receive alerts about exceptions.",
        ),
    ];
    content
        .into_iter()
        .enumerate()
        .map(|(i, (title, description))| Step {
            number: u8::try_from(i + 1).unwrap_or(u8::MAX),
            title: title.to_owned(),
            description: description.to_owned(),
        })
        .collect()
}

fn benefit_groups() -> Vec<BenefitGroup> {
    vec![
        BenefitGroup {
            title: "For Employees".to_owned(),
            benefits: [
                "No more manual sign-ins or time-consuming check-in processes",
                "Automatic attendance tracking eliminates paperwork",
                "Real-time notifications about shifts and schedule changes",
                "Transparent leave balance and attendance records",
                "Quick fingerprint verification takes seconds",
            ]
            .map(str::to_owned)
            .to_vec(),
        },
        BenefitGroup {
            title: "For Employers".to_owned(),
            benefits: [
                "Eliminate time theft and buddy punching completely",
                "Reduce administrative overhead and paperwork",
                "Access accurate, real-time attendance data",
                "Simplify payroll processing with integrated attendance",
                "Generate comprehensive attendance reports instantly",
            ]
            .map(str::to_owned)
            .to_vec(),
        },
        BenefitGroup {
            title: "For HR Teams".to_owned(),
            benefits: [
                "Centralized system for attendance and leave management",
                "Automated compliance with labor regulations",
                "Easy identification of attendance patterns and issues",
                "Streamlined approval workflows for leave requests",
                "Digital records for auditing and documentation",
            ]
            .map(str::to_owned)
            .to_vec(),
        },
    ]
}

// =============================================================================
// Template
// =============================================================================

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub hero: HeroContent,
    pub features: Vec<Feature>,
    pub steps: Vec<Step>,
    pub benefit_groups: Vec<BenefitGroup>,
}

/// Display the marketing home page.
pub async fn home() -> impl IntoResponse {
    HomeTemplate {
        hero: HeroContent::default(),
        features: features(),
        steps: steps(),
        benefit_groups: benefit_groups(),
    }
}
