//! Starter source shipped with the client, one sample per diagram type.
//!
//! These are the snippets preloaded into the editor when authoring a new
//! diagram, and what `diaglab template` prints.

use crate::DiagramType;

/// Starter code for the given diagram type.
pub fn starter_code(diagram_type: DiagramType) -> &'static str {
    match diagram_type {
        DiagramType::Aws => AWS_STARTER,
        DiagramType::Er => ER_STARTER,
        DiagramType::Json => JSON_STARTER,
        DiagramType::Mermaid => MERMAID_STARTER,
        DiagramType::Sql => SQL_STARTER,
    }
}

/// Short description of what the given diagram type is for.
pub fn type_description(diagram_type: DiagramType) -> &'static str {
    match diagram_type {
        DiagramType::Aws => {
            "AWS architecture diagrams written in Python with the diagrams \
             library. Supports services such as EC2, Lambda, RDS and S3."
        }
        DiagramType::Er => {
            "Entity-relationship diagrams for databases. Define entities, \
             attributes and relations in ERAlchemy syntax."
        }
        DiagramType::Json => {
            "Visualizes nested JSON structures as diagrams. Useful for \
             documenting APIs and configuration files."
        }
        DiagramType::Mermaid => {
            "General-purpose Mermaid diagrams: flowcharts, sequence \
             diagrams, Gantt charts and more."
        }
        DiagramType::Sql => {
            "Database schemas with tables, columns and relationships, in a \
             D2-style notation."
        }
    }
}

const AWS_STARTER: &str = r#"# AWS Architecture Diagram Example
from diagrams import Diagram, Cluster, Edge
from diagrams.aws.compute import EC2, Lambda
from diagrams.aws.database import RDS
from diagrams.aws.network import ELB, CloudFront
from diagrams.aws.storage import S3

with Diagram("Web Service Architecture", show=False, direction="TB"):
    # Frontend
    cdn = CloudFront("CDN")

    # Load Balancer
    lb = ELB("Load Balancer")

    # Web Servers
    with Cluster("Web Servers"):
        web_servers = [
            EC2("Web Server 1"),
            EC2("Web Server 2"),
            EC2("Web Server 3")
        ]

    # Application Layer
    with Cluster("Application Layer"):
        api = Lambda("API Gateway")
        processors = [
            Lambda("Processor 1"),
            Lambda("Processor 2")
        ]

    # Database
    database = RDS("Database")

    # Storage
    storage = S3("File Storage")

    # Connections
    cdn >> lb
    lb >> web_servers
    web_servers >> api
    api >> processors
    processors >> database
    processors >> storage"#;

const ER_STARTER: &str = r#"# Entity Relationship Diagram Example
from eralchemy import render_er

# Define your database schema
schema = '''
[User]
id INTEGER PRIMARY KEY
name VARCHAR(100) NOT NULL
email VARCHAR(100) UNIQUE NOT NULL
created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP

[Post]
id INTEGER PRIMARY KEY
title VARCHAR(200) NOT NULL
content TEXT
user_id INTEGER NOT NULL
created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP

[Comment]
id INTEGER PRIMARY KEY
content TEXT NOT NULL
post_id INTEGER NOT NULL
user_id INTEGER NOT NULL
created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP

[Category]
id INTEGER PRIMARY KEY
name VARCHAR(100) NOT NULL
description TEXT

[PostCategory]
post_id INTEGER NOT NULL
category_id INTEGER NOT NULL

User ||--o{ Post
Post ||--o{ Comment
User ||--o{ Comment
Post }o--o{ Category
'''

# This will generate an ER diagram
render_er(schema, 'output.png')"#;

const JSON_STARTER: &str = r#"{
  "application": {
    "name": "diaglab API",
    "version": "1.0.0",
    "description": "REST API for diagram generation",
    "config": {
      "database": {
        "host": "localhost",
        "port": 5432,
        "name": "diaglab",
        "ssl": true,
        "connections": {
          "min": 5,
          "max": 20
        }
      },
      "aws": {
        "region": "us-east-1",
        "services": {
          "s3": {
            "bucket": "diaglab-storage",
            "encryption": true
          },
          "lambda": {
            "timeout": 30,
            "memory": 256
          },
          "apiGateway": {
            "throttling": {
              "rateLimit": 1000,
              "burstLimit": 2000
            }
          }
        }
      },
      "authentication": {
        "jwt": {
          "secret": "your-secret-key",
          "expiresIn": "7d"
        },
        "providers": [
          "local",
          "google",
          "github"
        ]
      }
    },
    "endpoints": [
      {
        "path": "/auth/login",
        "method": "POST",
        "description": "User authentication"
      },
      {
        "path": "/diagrams",
        "method": "GET",
        "description": "Get user diagrams"
      },
      {
        "path": "/diagrams/generate",
        "method": "POST",
        "description": "Generate diagram from code"
      }
    ]
  }
}"#;

const MERMAID_STARTER: &str = r#"graph TD
    A[Start] --> B{Is user authenticated?}
    B -->|Yes| C[Show Dashboard]
    B -->|No| D[Show Login Form]

    D --> E[User enters credentials]
    E --> F{Valid credentials?}
    F -->|Yes| G[Generate JWT Token]
    F -->|No| H[Show Error Message]

    G --> I[Store session token]
    I --> C
    H --> D

    C --> J[User selects diagram type]
    J --> K[Show Code Editor]
    K --> L[User writes code]
    L --> M[User clicks Generate]

    M --> N{Valid code?}
    N -->|Yes| O[Send to Lambda Function]
    N -->|No| P[Show Validation Error]

    O --> Q[Generate Diagram]
    Q --> R[Upload to S3]
    R --> S[Return Image URL]
    S --> T[Display Diagram]

    P --> L

    T --> U{Save diagram?}
    U -->|Yes| V[Save to Database]
    U -->|No| W[Continue Editing]

    V --> X[Success Message]
    W --> L
    X --> C

    style A fill:#e1f5fe
    style C fill:#c8e6c9
    style T fill:#fff3e0
    style X fill:#e8f5e8"#;

const SQL_STARTER: &str = r#"# SQL Database Schema Diagram
# Define your database tables with relationships

users: {
  shape: sql_table
  id: int {constraint: primary_key}
  username: string {constraint: unique}
  email: string {constraint: unique}
  password_hash: string
  first_name: string
  last_name: string
  created_at: timestamp
  updated_at: timestamp
}

costumes: {
  shape: sql_table
  id: int {constraint: primary_key}
  name: string
  description: text
  silliness: int
  monster_id: int {constraint: foreign_key}
  user_id: int {constraint: foreign_key}
  created_at: timestamp
  last_updated: timestamp
}

monsters: {
  shape: sql_table
  id: int {constraint: primary_key}
  name: string
  movie: string
  weight: int
  height: int
  power_level: int
  created_at: timestamp
  last_updated: timestamp
}

# Define relationships between tables
costumes.monster_id -> monsters.id
costumes.user_id -> users.id"#;
