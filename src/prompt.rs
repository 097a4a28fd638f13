//! Fixed prompt material for the URL classification call.
//!
//! The system instruction is the behavioral contract with the reasoning
//! service: it defines how brand lookalikes, typosquats, raw-IP hosts, and
//! unrecognized domains must be scored. Treat edits here as behavior
//! changes, not copy changes.

use serde_json::{json, Value};

/// System instruction sent with every classification request.
pub const SYSTEM_INSTRUCTION: &str = "\
You are a strict and paranoid cybersecurity AI. Your job is to detect even the slightest sign \
that a URL might be fake, malicious, or a phishing attempt.

CRITICAL ANALYSIS RULES:
1. **Brand Impersonation**: If a URL looks like a popular brand (Facebook, Google, Apple, \
Amazon, Bank, Netflix, etc.) but the domain is NOT the official one, you MUST mark it as \
MALICIOUS (Score 80-100). Example: \"secure-google-login.com\" is MALICIOUS.
2. **Typosquatting**: If the URL has misspellings of popular names (e.g., \"g0ogle.com\", \
\"faceb0ok.com\", \"amaz0n.net\"), it is MALICIOUS (Score 90+).
3. **Suspicious Structure**: Look for long random strings, excessive subdomains (e.g., \
\"login.verify.account.update.com\"), or suspicious TLDs (.xyz, .top) combined with brand \
names. Mark these as HIGH RISK.
4. **IP Addresses**: If the URL uses an IP address (like http://192.168.1.5) instead of a \
domain name, mark it as SUSPICIOUS or MALICIOUS.
5. **Unknown Domains**: If you do not recognize the domain as a well-known, safe website, DO \
NOT mark it as 0 risk. Mark it as SUSPICIOUS (Score 40-60) to be safe.

ONLY mark a URL as \"Safe\" (Score 0-10) if you are 100% sure it is a legitimate, official \
website (like google.com, wikipedia.org, bbc.co.uk).

Explanation Requirements:
- Use simple, plain English.
- Be direct. Tell the user exactly what is wrong.
- Example: \"This is dangerous because it tries to look like Facebook but is not the real \
facebook.com.\"";

/// Build the single user message for a classification request.
pub fn user_message(url: &str) -> String {
    format!("Analyze this URL carefully: {url}")
}

/// Response schema the service is required to conform to, in the
/// generateContent schema dialect. All four fields are mandatory.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "riskScore": {
                "type": "NUMBER",
                "description": "A score from 0 (Safe) to 100 (Deadly). Be strict."
            },
            "threatType": {
                "type": "STRING",
                "description": "Type of threat: 'Phishing', 'Malware', 'Fake Site', 'Scam', 'Suspicious', or 'Safe'."
            },
            "explanation": {
                "type": "STRING",
                "description": "A simple, easy-to-understand explanation for a non-technical user."
            },
            "technicalFlags": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "List of red flags (e.g., 'Not official domain', 'Misspelled name')."
            }
        },
        "required": ["riskScore", "threatType", "explanation", "technicalFlags"]
    })
}
