//! Compiled-in portfolio content.
//!
//! `RULES` is scanned top to bottom, so specific triggers (product names)
//! sit above broad ones (`about`, `project`).

pub(super) const ANSWERS: &[(&str, &str)] = &[
    (
        "projects",
        "I've built several agentic systems including the **Gemini DevOps Copilot**, **Mentara AI**, and **Code Vortex**. Which one would you like to know more about?",
    ),
    (
        "about",
        "I'm G R Harsha, an AI Engineer specializing in **Agentic Systems** and **DevOps Automation**. I look beyond simple chatbots to build autonomous systems that reason and act.",
    ),
    (
        "contact",
        "You can reach me at **grharsha128@gmail.com** or connect on <a href=\"https://www.linkedin.com/in/grharsha777/\" target=\"_blank\">LinkedIn</a>. I'm open to internships and collaborations!",
    ),
    (
        "skills",
        "My tech stack includes **Python, FastAPI, LangChain, AutoGen, Docker, and Kubernetes**. I focus on production-grade AI engineering.",
    ),
    (
        "gemini",
        "**Gemini DevOps Copilot** is an AI assistant that automates CI/CD configs and incident response using the Gemini API. It's designed to reduce toil for DevOps teams.",
    ),
    (
        "mentara",
        "**Mentara AI** is a mental wellness platform combining full-stack development with LLMs to provide supportive conversations.",
    ),
    (
        "code vortex",
        "**Code Vortex** is a suite of developer tools designed to automate documentation and code review processes.",
    ),
    (
        "experience",
        "I'm currently a B.Tech CSE (AI) student at NIAT & Yenepoya University. I've also been a Mentor at **GSSoC** and a Campus Ambassador.",
    ),
    (
        "agentic",
        "My 'Agentic' approach means I build systems that use **ReAct loops** (Reasoning + Acting). My agents don't just talk; they use tools, query databases, and execute workflows.",
    ),
    (
        "resume",
        "Here's my résumé: <a href=\"https://drive.google.com/file/d/1BnObISeyCMV9UTi9V_qIKWJitsyrycq1/view\" target=\"_blank\">View Resume</a>. It covers my **projects**, **skills**, and **experience**.",
    ),
    (
        "default",
        "I can tell you about my **projects**, **skills**, **experience**, or how to **contact** Harsha. What would you like to know?",
    ),
];

pub(super) const RULES: &[(&str, &str)] = &[
    ("gemini", "gemini"),
    ("devops", "gemini"),
    ("copilot", "gemini"),
    ("ci/cd", "gemini"),
    ("mentara", "mentara"),
    ("wellness", "mentara"),
    ("mental health", "mentara"),
    ("code vortex", "code vortex"),
    ("vortex", "code vortex"),
    ("résumé", "resume"),
    ("resume", "resume"),
    ("agentic", "agentic"),
    ("react loop", "agentic"),
    ("autonomous", "agentic"),
    ("agent", "agentic"),
    ("skill", "skills"),
    ("tech stack", "skills"),
    ("stack", "skills"),
    ("technolog", "skills"),
    ("python", "skills"),
    ("kubernetes", "skills"),
    ("experience", "experience"),
    ("education", "experience"),
    ("student", "experience"),
    ("university", "experience"),
    ("gssoc", "experience"),
    ("mentor", "experience"),
    ("contact", "contact"),
    ("email", "contact"),
    ("linkedin", "contact"),
    ("hire", "contact"),
    ("internship", "contact"),
    ("project", "projects"),
    ("built", "projects"),
    ("portfolio", "projects"),
    ("about", "about"),
    ("who are you", "about"),
    ("yourself", "about"),
    ("introduce", "about"),
];

pub(super) const SUGGESTIONS: &[&str] = &[
    "Show best project",
    "Explain tech stack",
    "Share résumé",
    "Contact info",
];
