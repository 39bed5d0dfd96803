use time::{Duration, OffsetDateTime};

use crate::models::{Category, Entry};

struct Sample {
    id: &'static str,
    title: &'static str,
    team_name: &'static str,
    description: &'static str,
    image_url: &'static str,
    demo_url: &'static str,
    github_url: &'static str,
    category: Category,
    votes: u32,
}

const SAMPLES: [Sample; 6] = [
    Sample {
        id: "sample1",
        title: "EcoTracker App",
        team_name: "Green Coders",
        description: "A comprehensive mobile application that helps users track their carbon footprint and suggests eco-friendly alternatives for daily activities.",
        image_url: "https://images.pexels.com/photos/1261728/pexels-photo-1261728.jpeg",
        demo_url: "https://ecotracker-demo.com",
        github_url: "https://github.com/greencoders/ecotracker",
        category: Category::Project,
        votes: 15,
    },
    Sample {
        id: "sample2",
        title: "AI Portrait Generator",
        team_name: "Vision Labs",
        description: "An advanced AI-powered tool that generates stunning professional portraits from simple sketches or descriptions using cutting-edge machine learning.",
        image_url: "https://images.pexels.com/photos/5428836/pexels-photo-5428836.jpeg",
        demo_url: "https://ai-portrait-gen.com",
        github_url: "https://github.com/visionlabs/portrait-ai",
        category: Category::Photo,
        votes: 23,
    },
    Sample {
        id: "sample3",
        title: "AutoEdit Pro",
        team_name: "Media Innovators",
        description: "Revolutionary video editing platform that uses AI to automatically edit raw footage into professional-quality videos with music, transitions, and effects.",
        image_url: "https://images.pexels.com/photos/4173251/pexels-photo-4173251.jpeg",
        demo_url: "https://autoedit-pro.com",
        github_url: "https://github.com/mediainnovators/autoedit",
        category: Category::Video,
        votes: 31,
    },
    Sample {
        id: "sample4",
        title: "StudyBuddy AI",
        team_name: "Learning Labs",
        description: "An intelligent study companion that creates personalized learning paths, provides instant feedback, and adapts to individual learning styles.",
        image_url: "https://images.pexels.com/photos/5965592/pexels-photo-5965592.jpeg",
        demo_url: "https://studybuddy-ai.com",
        github_url: "https://github.com/learninglabs/studybuddy",
        category: Category::Project,
        votes: 18,
    },
    Sample {
        id: "sample5",
        title: "DreamScape Creator",
        team_name: "Pixel Dreamers",
        description: "Transform your wildest imagination into stunning visual art. This AI generates breathtaking landscapes and fantasy scenes from text descriptions.",
        image_url: "https://images.pexels.com/photos/1323550/pexels-photo-1323550.jpeg",
        demo_url: "https://dreamscape-creator.com",
        github_url: "https://github.com/pixeldreamers/dreamscape",
        category: Category::Photo,
        votes: 27,
    },
    Sample {
        id: "sample6",
        title: "CineMagic AI",
        team_name: "Film Tech Studios",
        description: "Create Hollywood-quality movie trailers and short films automatically. Input your script and watch AI bring your story to life with stunning visuals.",
        image_url: "https://images.pexels.com/photos/7991579/pexels-photo-7991579.jpeg",
        demo_url: "https://cinemagic-ai.com",
        github_url: "https://github.com/filmtech/cinemagic",
        category: Category::Video,
        votes: 35,
    },
];

pub fn seed_voter(n: u32) -> String {
    format!("seed-voter-{n}")
}

/// Demonstration entries, submitted one day apart going back from `now`.
/// Their votes come from synthetic `seed-voter-<n>` devices.
pub fn sample_entries(now: OffsetDateTime) -> Vec<Entry> {
    SAMPLES.iter()
        .zip(1i64..)
        .map(|(sample, days_ago)| {
            let voted_by: Vec<String> = (1..=sample.votes).map(seed_voter).collect();
            Entry {
                id: sample.id.to_string(),
                title: sample.title.to_string(),
                team_name: sample.team_name.to_string(),
                description: sample.description.to_string(),
                image_url: Some(sample.image_url.to_string()),
                demo_url: Some(sample.demo_url.to_string()),
                github_url: Some(sample.github_url.to_string()),
                category: sample.category,
                votes: voted_by.len() as u32,
                submitted_at: now - Duration::days(days_ago),
                voted_by,
            }
        })
        .collect()
}
