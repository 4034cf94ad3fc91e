//! Keyword-driven first-aid responder.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Opening line shown before the user has said anything.
pub const GREETING: &str = "Hello! I'm your medical assistant. I can help with \
                            first aid guidance and emergency procedures. How \
                            can I assist you today?";

const ESCALATION: &str = "If this is a life-threatening emergency, please call \
                          emergency services (911/108) immediately. I can \
                          provide first aid guidance while you wait for help.";

const FALLBACK: &str = "I can help with first aid for: heart attacks, choking, \
                        bleeding, burns, fractures, and unconscious persons. \
                        Please describe your emergency or ask about specific \
                        first aid procedures.";

/// A keyword rule. Any keyword appearing in the lowercased message selects
/// the reply.
struct Rule {
  keywords: &'static [&'static str],
  reply:    &'static str,
}

/// Checked top to bottom; the first hit wins.
const RULES: &[Rule] = &[
  Rule {
    keywords: &["heart attack"],
    reply:    "For suspected heart attack: 1. Call emergency services \
               immediately. 2. Help the person sit comfortably. 3. Give \
               aspirin if available and not allergic. 4. Perform CPR if \
               person becomes unconscious.",
  },
  Rule {
    keywords: &["choking"],
    reply:    "For choking: 1. Encourage coughing if person can still \
               breathe. 2. Perform back blows (5 sharp blows between shoulder \
               blades). 3. If unsuccessful, perform abdominal thrusts \
               (Heimlich maneuver). 4. Call emergency services.",
  },
  Rule {
    keywords: &["bleeding"],
    reply:    "For severe bleeding: 1. Apply direct pressure with clean \
               cloth. 2. Elevate the wounded area above heart level if \
               possible. 3. Don't remove embedded objects. 4. Call emergency \
               services for severe bleeding.",
  },
  Rule {
    keywords: &["burn"],
    reply:    "For burns: 1. Cool the burn with running water for 20 \
               minutes. 2. Remove jewelry before swelling. 3. Cover with \
               sterile gauze. 4. Don't use ice or butter. Seek medical \
               attention for severe burns.",
  },
  Rule {
    keywords: &["fracture"],
    reply:    "For suspected fracture: 1. Don't move the injured area. 2. \
               Immobilize with splint if trained. 3. Apply ice wrapped in \
               cloth. 4. Seek immediate medical attention.",
  },
  Rule {
    keywords: &["unconscious"],
    reply:    "For unconscious person: 1. Check responsiveness and \
               breathing. 2. Call emergency services. 3. Place in recovery \
               position if breathing. 4. Perform CPR if not breathing.",
  },
  Rule {
    keywords: &["emergency", "urgent"],
    reply:    ESCALATION,
  },
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
  pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
  pub reply: String,
}

/// Pick the reply for `message`.
///
/// Returns [`Error::EmptyMessage`] if the message is blank.
pub fn respond(message: &str) -> Result<&'static str> {
  if message.trim().is_empty() {
    return Err(Error::EmptyMessage);
  }
  let lower = message.to_lowercase();
  let reply = RULES
    .iter()
    .find(|rule| rule.keywords.iter().any(|k| lower.contains(k)))
    .map_or(FALLBACK, |rule| rule.reply);
  Ok(reply)
}
