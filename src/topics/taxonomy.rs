/// Hand-curated topic vocabulary. Keywords containing a space are matched as
/// phrases against the raw lower-cased text; the rest are matched per token.
pub const TAXONOMY: &[(&str, &[&str])] = &[
    (
        "technology",
        &[
            "tech", "software", "hardware", "programming", "digital", "ai", "blockchain",
            "crypto", "cybersecurity", "data", "cloud", "mobile", "app", "startup",
            "innovation", "web", "code", "developer", "computer", "algorithm",
            "machine learning",
        ],
    ),
    (
        "artificial_intelligence",
        &[
            "ai", "artificial intelligence", "machine learning", "ml", "deep learning",
            "neural network", "llm", "large language model", "transformer", "gpt",
            "computer vision", "nlp", "natural language", "inference", "training", "model",
            "dataset", "cuda", "gpu", "tensor", "nvidia",
        ],
    ),
    (
        "science",
        &[
            "research", "study", "scientific", "discovery", "experiment", "physics",
            "biology", "chemistry", "astronomy", "space", "climate", "medicine",
            "neuroscience", "quantum", "evolution", "genetics", "laboratory",
        ],
    ),
    (
        "business",
        &[
            "market", "company", "startup", "finance", "economy", "investment", "stock",
            "trade", "entrepreneur", "industry", "revenue", "profit", "corporate",
            "management", "strategy", "venture", "acquisition",
        ],
    ),
    (
        "legal",
        &[
            "law", "legal", "attorney", "lawyer", "court", "litigation", "judge", "judicial",
            "statute", "regulation", "compliance", "contract", "plaintiff", "defendant",
            "counsel", "precedent", "jurisdiction", "tort", "liability", "patent",
            "trademark", "copyright", "intellectual property", "prosecution", "defense",
            "appellate", "supreme court", "constitutional", "civil rights", "criminal",
            "corporate law", "tax law", "regulatory", "arbitration", "mediation",
            "settlement", "brief", "motion", "hearing", "trial",
        ],
    ),
    (
        "politics",
        &[
            "government", "policy", "election", "political", "democracy", "congress",
            "senate", "legislation", "law", "regulation", "vote", "campaign", "diplomatic",
            "foreign", "domestic", "reform", "administration",
        ],
    ),
    (
        "culture",
        &[
            "art", "music", "film", "movie", "entertainment", "culture", "book",
            "literature", "fashion", "design", "theater", "festival", "exhibition",
            "performance", "creative", "media", "celebrity",
        ],
    ),
    (
        "health",
        &[
            "health", "medical", "wellness", "fitness", "nutrition", "diet", "mental health",
            "healthcare", "disease", "treatment", "therapy", "prevention", "medicine",
            "vaccine", "research", "clinical",
        ],
    ),
    (
        "sports",
        &[
            "sports", "game", "team", "player", "competition", "tournament", "championship",
            "athlete", "football", "basketball", "baseball", "soccer", "olympic", "fitness",
            "league", "match", "score",
        ],
    ),
    (
        "environment",
        &[
            "environment", "climate", "sustainability", "renewable", "energy", "green",
            "conservation", "pollution", "recycling", "ecosystem", "biodiversity", "carbon",
            "environmental", "sustainable",
        ],
    ),
    (
        "education",
        &[
            "education", "learning", "teaching", "student", "school", "university",
            "academic", "research", "study", "training", "skill", "knowledge", "course",
            "curriculum", "teacher", "professor", "classroom",
        ],
    ),
    (
        "gaming",
        &[
            "game", "gaming", "esports", "playstation", "xbox", "nintendo", "console",
            "multiplayer", "gameplay", "streamer", "twitch", "videogame", "gamer", "steam",
            "rpg", "fps", "mmo",
        ],
    ),
];
