//! The starter project every new session begins with.

use chrono::{DateTime, Utc};

use crate::types::{FileNode, Project};

/// Id of the file a fresh project opens on.
pub const DEFAULT_ACTIVE_FILE: &str = "src_app_tsx";

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Sparrow AI Generated App</title>
</head>
<body>
    <div id="root"></div>
    <script type="module" src="/src/main.tsx"></script>
</body>
</html>"#;

const MAIN_TSX: &str = r#"import React from 'react'
import ReactDOM from 'react-dom/client'
import App from './App'
import './index.css'

ReactDOM.createRoot(document.getElementById('root')!).render(
  <React.StrictMode>
    <App />
  </React.StrictMode>,
)"#;

const APP_TSX: &str = r#"import React from 'react'
import { Sparkles } from 'lucide-react'

function App() {
  return (
    <div className="app-container">
      <header>
        <Sparkles className="icon" />
        <h1>Sparrow AI</h1>
      </header>
      <main>
        <p>Welcome to your React + TypeScript project!</p>
        <p>Start chatting to build your application.</p>
      </main>
    </div>
  )
}

export default App"#;

const INDEX_CSS: &str = r#"body {
  margin: 0;
  font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', 'Oxygen',
    'Ubuntu', 'Cantarell', 'Fira Sans', 'Droid Sans', 'Helvetica Neue',
    sans-serif;
  -webkit-font-smoothing: antialiased;
  -moz-osx-font-smoothing: grayscale;
  background-color: #0f172a;
  color: white;
}

.app-container {
  display: flex;
  flex-direction: column;
  align-items: center;
  justify-content: center;
  height: 100vh;
  text-align: center;
}

header {
  display: flex;
  align-items: center;
  gap: 1rem;
  margin-bottom: 2rem;
}

.icon {
  width: 3rem;
  height: 3rem;
  color: #38bdf8;
}"#;

const PACKAGE_JSON: &str = r#"{
  "name": "sparrow-react-ts",
  "private": true,
  "version": "0.0.0",
  "type": "module",
  "scripts": {
    "dev": "vite",
    "build": "tsc && vite build",
    "preview": "vite preview"
  },
  "dependencies": {
    "react": "^18.2.0",
    "react-dom": "^18.2.0",
    "lucide-react": "latest"
  },
  "devDependencies": {
    "@types/react": "^18.2.0",
    "@types/react-dom": "^18.2.0",
    "@vitejs/plugin-react": "^4.0.0",
    "typescript": "^5.0.0",
    "vite": "^4.4.0"
  }
}"#;

impl Project {
    /// The default React + TypeScript + Vite starter.
    pub fn default_template(now: DateTime<Utc>) -> Self {
        let src = Some("folder_src".to_string());
        let files = vec![
            FileNode::file("root_index_html", "index.html", None, INDEX_HTML, "html", now),
            FileNode::file(
                "root_package_json",
                "package.json",
                None,
                PACKAGE_JSON,
                "json",
                now,
            ),
            FileNode::folder("folder_src", "src", None, now),
            FileNode::file(
                "src_main_tsx",
                "src/main.tsx",
                src.clone(),
                MAIN_TSX,
                "typescript",
                now,
            ),
            FileNode::file(
                DEFAULT_ACTIVE_FILE,
                "src/App.tsx",
                src.clone(),
                APP_TSX,
                "typescript",
                now,
            ),
            FileNode::file("src_index_css", "src/index.css", src, INDEX_CSS, "css", now),
        ];

        Self {
            id: now.timestamp_millis().to_string(),
            name: "Sparrow React Project".to_string(),
            description: "React + TypeScript application".to_string(),
            files,
            created_at: now,
            last_modified: now,
        }
    }
}
