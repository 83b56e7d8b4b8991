//! Skill Graph: category → canonical skill → synonym phrases.
//!
//! Built once at startup and shared read-only through `AppState`.

use serde::{Deserialize, Serialize};

use crate::skills::normalizer::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Hard,
    Soft,
    Other,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 3] = [
        SkillCategory::Hard,
        SkillCategory::Soft,
        SkillCategory::Other,
    ];

    /// Fixed presentation label attached to every category report.
    pub fn impact_label(self) -> &'static str {
        match self {
            SkillCategory::Hard => "High Impact",
            SkillCategory::Soft => "Medium Impact",
            SkillCategory::Other => "Low Impact",
        }
    }
}

/// A canonical skill and its synonym phrases, each already normalized into words.
#[derive(Debug, Clone)]
pub struct Skill {
    pub name: String,
    pub synonyms: Vec<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct SkillGraph {
    hard: Vec<Skill>,
    soft: Vec<Skill>,
    other: Vec<Skill>,
}

type SkillTable<'a> = &'a [(&'a str, &'a [&'a str])];

impl SkillGraph {
    /// Builds a graph from raw `(skill, synonyms)` tables.
    ///
    /// Synonyms go through the document normalizer so both sides of the
    /// containment test share one vocabulary. A synonym that normalizes to
    /// nothing is dropped; an empty phrase would match every document.
    pub fn from_tables(hard: SkillTable<'_>, soft: SkillTable<'_>, other: SkillTable<'_>) -> Self {
        Self {
            hard: build_category(hard),
            soft: build_category(soft),
            other: build_category(other),
        }
    }

    pub fn builtin() -> Self {
        Self::from_tables(HARD_SKILLS, SOFT_SKILLS, OTHER_SKILLS)
    }

    pub fn skills(&self, category: SkillCategory) -> &[Skill] {
        match category {
            SkillCategory::Hard => &self.hard,
            SkillCategory::Soft => &self.soft,
            SkillCategory::Other => &self.other,
        }
    }

    pub fn len(&self) -> usize {
        self.hard.len() + self.soft.len() + self.other.len()
    }
}

fn build_category(table: SkillTable<'_>) -> Vec<Skill> {
    let mut skills: Vec<Skill> = Vec::with_capacity(table.len());
    for (name, synonyms) in table {
        if skills.iter().any(|s| s.name == *name) {
            continue;
        }
        let mut phrases: Vec<Vec<String>> = Vec::new();
        for synonym in *synonyms {
            let words = normalize(synonym);
            if !words.is_empty() && !phrases.contains(&words) {
                phrases.push(words);
            }
        }
        skills.push(Skill {
            name: name.to_string(),
            synonyms: phrases,
        });
    }
    skills
}

// ────────────────────────────────────────────────────────────────────────────
// Built-in vocabulary
// ────────────────────────────────────────────────────────────────────────────

const HARD_SKILLS: SkillTable<'static> = &[
    ("Python", &["python", "python3"]),
    ("JavaScript", &["javascript", "js", "ecmascript"]),
    ("TypeScript", &["typescript", "ts"]),
    ("Java", &["java"]),
    ("Go", &["golang", "go lang"]),
    ("Rust", &["rust", "rustlang"]),
    ("C#", &["csharp", "c sharp", ".net", "dotnet"]),
    ("C++", &["cpp", "c plus plus"]),
    ("Ruby", &["ruby", "ruby on rails", "rails"]),
    ("PHP", &["php", "laravel"]),
    ("Kotlin", &["kotlin"]),
    ("Swift", &["swift", "swiftui"]),
    ("SQL", &["sql", "mysql", "postgresql", "postgres", "sqlite"]),
    ("NoSQL", &["nosql", "mongodb", "dynamodb", "cassandra"]),
    ("React", &["react", "reactjs", "react js"]),
    ("Angular", &["angular", "angularjs"]),
    ("Vue", &["vue", "vuejs", "vue js"]),
    ("Node.js", &["node", "nodejs", "node js"]),
    ("HTML/CSS", &["html", "css", "html5", "css3"]),
    ("GraphQL", &["graphql"]),
    ("REST APIs", &["rest api", "rest apis", "restful", "rest"]),
    ("Django", &["django"]),
    ("Flask", &["flask"]),
    ("Spring", &["spring boot", "spring framework"]),
    ("AWS", &["aws", "amazon web services", "ec2", "s3", "lambda"]),
    ("Azure", &["azure", "microsoft azure"]),
    ("GCP", &["gcp", "google cloud", "google cloud platform"]),
    ("Docker", &["docker", "containers", "containerization"]),
    ("Kubernetes", &["kubernetes", "k8s"]),
    ("Terraform", &["terraform", "infrastructure as code", "iac"]),
    (
        "CI/CD",
        &[
            "ci cd",
            "cicd",
            "continuous integration",
            "continuous delivery",
            "github actions",
            "jenkins",
        ],
    ),
    ("Git", &["git", "github", "gitlab"]),
    ("Linux", &["linux", "unix", "bash"]),
    ("Machine Learning", &["machine learning", "ml"]),
    ("Deep Learning", &["deep learning", "neural networks", "neural network"]),
    ("TensorFlow", &["tensorflow"]),
    ("PyTorch", &["pytorch", "torch"]),
    ("Data Analysis", &["data analysis", "data analytics", "pandas", "numpy"]),
    (
        "Data Engineering",
        &[
            "data engineering",
            "etl",
            "data pipelines",
            "data pipeline",
            "spark",
            "airflow",
        ],
    ),
    ("Microservices", &["microservices", "microservice", "service oriented architecture"]),
    ("Distributed Systems", &["distributed systems", "distributed system"]),
    (
        "Testing",
        &[
            "unit testing",
            "integration testing",
            "test automation",
            "tdd",
            "pytest",
            "jest",
        ],
    ),
    ("Security", &["security", "cybersecurity", "oauth", "encryption"]),
    ("Kafka", &["kafka", "event streaming"]),
    ("Redis", &["redis", "caching"]),
    ("Excel", &["excel", "spreadsheets", "vlookup"]),
    ("Tableau", &["tableau", "power bi", "powerbi"]),
    ("Figma", &["figma"]),
];

const SOFT_SKILLS: SkillTable<'static> = &[
    (
        "Communication",
        &[
            "communication",
            "communicate",
            "communicating",
            "written communication",
            "verbal communication",
        ],
    ),
    ("Leadership", &["leadership", "lead", "led", "leading"]),
    ("Teamwork", &["teamwork", "team player", "collaborative", "collaboration", "collaborate"]),
    ("Problem Solving", &["problem solving", "problem solver", "troubleshooting", "troubleshoot"]),
    ("Mentoring", &["mentoring", "mentor", "mentored", "coaching"]),
    ("Time Management", &["time management", "prioritization", "prioritize", "deadlines"]),
    ("Adaptability", &["adaptability", "adaptable", "flexible", "flexibility"]),
    ("Critical Thinking", &["critical thinking", "analytical", "analytical skills"]),
    (
        "Attention to Detail",
        &[
            "attention detail",
            "detail oriented",
            "detail-oriented",
            "meticulous",
        ],
    ),
    ("Ownership", &["ownership", "self starter", "self-motivated", "proactive"]),
    ("Stakeholder Management", &["stakeholder management", "stakeholders", "stakeholder"]),
    ("Presentation", &["presentation", "presentations", "public speaking"]),
    ("Creativity", &["creativity", "creative", "innovative", "innovation"]),
    ("Cross-functional Collaboration", &["cross functional", "cross-functional"]),
    (
        "Customer Focus",
        &[
            "customer focus",
            "customer facing",
            "client facing",
            "customer obsession",
        ],
    ),
];

const OTHER_SKILLS: SkillTable<'static> = &[
    ("Agile", &["agile", "scrum", "kanban", "sprint planning"]),
    ("Project Management", &["project management", "program management", "jira"]),
    ("Product Management", &["product management", "product roadmap", "roadmap"]),
    ("System Design", &["system design", "architecture", "software architecture"]),
    (
        "Bachelor's Degree",
        &[
            "bachelor",
            "bachelors",
            "bachelor s",
            "bs",
            "ba",
            "undergraduate degree",
        ],
    ),
    ("Master's Degree", &["master", "masters", "master s", "ms", "msc", "mba"]),
    ("PhD", &["phd", "doctorate"]),
    ("AWS Certification", &["aws certified", "aws certification"]),
    ("PMP", &["pmp", "project management professional"]),
    ("Open Source", &["open source", "open-source"]),
    ("Remote Work", &["remote", "distributed team"]),
    ("Startup Experience", &["startup", "start up", "early stage"]),
    ("Fintech", &["fintech", "payments", "banking"]),
    ("Healthcare", &["healthcare", "hipaa", "clinical"]),
    ("E-commerce", &["ecommerce", "e commerce", "online retail"]),
    ("Accessibility", &["accessibility", "a11y", "wcag"]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_graph_has_every_category() {
        let graph = SkillGraph::builtin();
        for category in SkillCategory::ALL {
            assert!(!graph.skills(category).is_empty(), "{category:?} is empty");
        }
    }

    #[test]
    fn test_skill_names_unique_within_category() {
        let graph = SkillGraph::builtin();
        for category in SkillCategory::ALL {
            let skills = graph.skills(category);
            for (i, skill) in skills.iter().enumerate() {
                assert!(
                    skills[i + 1..].iter().all(|s| s.name != skill.name),
                    "duplicate skill {}",
                    skill.name
                );
            }
        }
    }

    #[test]
    fn test_no_builtin_synonym_is_empty() {
        let graph = SkillGraph::builtin();
        for category in SkillCategory::ALL {
            for skill in graph.skills(category) {
                assert!(!skill.synonyms.is_empty(), "{} has no synonyms", skill.name);
                assert!(skill.synonyms.iter().all(|p| !p.is_empty()));
            }
        }
    }

    #[test]
    fn test_synonyms_are_normalized_at_build_time() {
        const TABLE: &[(&str, &[&str])] = &[("CI/CD", &["CI/CD", "Ruby on Rails"])];
        let graph = SkillGraph::from_tables(TABLE, &[], &[]);
        let skill = &graph.skills(SkillCategory::Hard)[0];
        assert_eq!(skill.synonyms[0], vec!["ci", "cd"]);
        // "on" is a stopword on both sides of the match
        assert_eq!(skill.synonyms[1], vec!["ruby", "rails"]);
    }

    #[test]
    fn test_stopword_only_synonym_is_dropped() {
        const TABLE: &[(&str, &[&str])] = &[("Odd", &["the", "and of", "odd"])];
        let graph = SkillGraph::from_tables(TABLE, &[], &[]);
        let skill = &graph.skills(SkillCategory::Hard)[0];
        assert_eq!(skill.synonyms, vec![vec!["odd".to_string()]]);
    }

    #[test]
    fn test_impact_labels() {
        assert_eq!(SkillCategory::Hard.impact_label(), "High Impact");
        assert_eq!(SkillCategory::Soft.impact_label(), "Medium Impact");
        assert_eq!(SkillCategory::Other.impact_label(), "Low Impact");
    }
}
