//! Built-in demo identity and canned diagrams.
//!
//! The demo session lets someone explore the client without an account or a
//! reachable service. The sentinel user id below is the only identity for
//! which the collection manager will synthesize local data; it is defined
//! here and nowhere else.
use chrono::{DateTime, Duration, Utc};

use crate::{AuthSession, Diagram, DiagramType, User};

/// Reserved user id marking a demo session.
pub const DEMO_USER_ID: &str = "demo-user-123";

/// Placeholder token stored for demo sessions. Never accepted by the
/// service; demo sessions are expected to stay offline.
pub const DEMO_TOKEN: &str = "demo-jwt-token-12345";

/// The canned demo identity.
pub fn demo_user() -> User {
    User {
        user_id: DEMO_USER_ID.to_string(),
        name: "Demo User".to_string(),
        email: "demo@diaglab.dev".to_string(),
    }
}

/// A ready-to-persist demo session.
pub fn demo_session() -> AuthSession {
    AuthSession {
        user: demo_user(),
        token: DEMO_TOKEN.to_string(),
        expires_in: None,
    }
}

/// Four example diagrams with timestamps relative to `now`.
pub fn demo_diagrams(now: DateTime<Utc>) -> Vec<Diagram> {
    vec![
        Diagram {
            id: "demo-1".to_string(),
            title: "AWS Web Architecture".to_string(),
            description: Some("Scalable web architecture on AWS".to_string()),
            diagram_type: DiagramType::Aws,
            code: "# Demo AWS Architecture".to_string(),
            image_url: "https://via.placeholder.com/400x300/3B82F6/FFFFFF?text=AWS+Diagram"
                .to_string(),
            created_at: now - Duration::days(2),
            updated_at: now - Duration::days(1),
            user_id: DEMO_USER_ID.to_string(),
        },
        Diagram {
            id: "demo-2".to_string(),
            title: "E-Commerce Database".to_string(),
            description: Some("Database schema for an e-commerce platform".to_string()),
            diagram_type: DiagramType::Er,
            code: "# Demo ER Diagram".to_string(),
            image_url: "https://via.placeholder.com/400x300/10B981/FFFFFF?text=ER+Diagram"
                .to_string(),
            created_at: now - Duration::days(5),
            updated_at: now - Duration::days(3),
            user_id: DEMO_USER_ID.to_string(),
        },
        Diagram {
            id: "demo-3".to_string(),
            title: "API Configuration".to_string(),
            description: Some("JSON layout of a microservice configuration".to_string()),
            diagram_type: DiagramType::Json,
            code: "{}".to_string(),
            image_url: "https://via.placeholder.com/400x300/8B5CF6/FFFFFF?text=JSON+Structure"
                .to_string(),
            created_at: now - Duration::days(7),
            updated_at: now - Duration::days(6),
            user_id: DEMO_USER_ID.to_string(),
        },
        Diagram {
            id: "demo-4".to_string(),
            title: "Authentication Flow".to_string(),
            description: Some("Flowchart of the user sign-in process".to_string()),
            diagram_type: DiagramType::Mermaid,
            code: "graph TD\n  A[Start] --> B[Login]".to_string(),
            image_url: "https://via.placeholder.com/400x300/F59E0B/FFFFFF?text=Mermaid+Flow"
                .to_string(),
            created_at: now - Duration::days(10),
            updated_at: now - Duration::days(8),
            user_id: DEMO_USER_ID.to_string(),
        },
    ]
}
