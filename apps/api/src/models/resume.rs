use serde::{Deserialize, Serialize};

/// A resume line item.
///
/// `authentic = false` marks a bullet the generation step may have embellished
/// beyond the source resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bullet {
    pub text: String,
    pub authentic: bool,
}

impl Default for Bullet {
    fn default() -> Self {
        Self {
            text: String::new(),
            authentic: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub company: String,
    pub title: String,
    pub dates: String,
    pub bullets: Vec<Bullet>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub dates: String,
}

/// Strict internal resume shape. Total: every field has a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub summary: String,
    pub experience: Vec<Experience>,
    pub skills: Vec<String>,
    pub education: Vec<Education>,
}

impl ResumeRecord {
    pub fn bullets(&self) -> impl Iterator<Item = &Bullet> {
        self.experience.iter().flat_map(|e| e.bullets.iter())
    }

    /// Flattens the record into plain text for skill detection.
    pub fn plain_text(&self) -> String {
        let mut parts: Vec<&str> = vec![&self.summary];
        for exp in &self.experience {
            parts.push(&exp.title);
            parts.push(&exp.company);
            parts.extend(exp.bullets.iter().map(|b| b.text.as_str()));
        }
        parts.extend(self.skills.iter().map(String::as_str));
        for edu in &self.education {
            parts.push(&edu.degree);
            parts.push(&edu.institution);
        }
        parts
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
