use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
    /// Numbers and other quantities.
    Value,
    /// Determiners, pronouns, prepositions, conjunctions and question words.
    Function,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub text: String,
    pub pos: PartOfSpeech,
}

impl Term {
    pub fn is_noun(&self) -> bool { self.pos == PartOfSpeech::Noun }
}

/// Part-of-speech tagging and noun normalization used by both indexing and querying.
pub trait Analyzer: Send + Sync {
    /// Ordered, tagged tokens of a free-form text. Multi-word nouns count as one token.
    fn terms(&self, text: &str) -> Vec<Term>;

    /// Tokens of a single sentence, such as a user question.
    fn sentence_terms(&self, text: &str) -> Vec<Term> { self.terms(text) }

    /// Base form of a noun, e.g. "Ear Infections" -> "ear infection".
    fn noun_root(&self, noun: &str) -> String;
}

lazy_static! {
    static ref WORD: Regex = Regex::new(r"(?u)[\p{L}\p{N}][\p{L}\p{N}'-]*").expect("valid regex");
    static ref FUNCTION_WORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","an","the","this","that","these","those","each","every","some","any","no","all","both","either","neither",
            "another","other","such","much","many","few","several","more","most","less","least",
            "i","me","my","mine","myself","you","your","yours","yourself","he","him","his","she","her","hers","it","its","itself",
            "we","us","our","ours","they","them","their","theirs","themselves","one","someone","anyone","something","anything",
            "nothing","everything","everyone","somebody","anybody",
            "about","above","across","after","against","along","among","around","at","before","behind","below","beneath",
            "beside","between","beyond","by","down","during","except","for","from","in","inside","into","like","near","of",
            "off","on","onto","out","outside","over","past","since","through","throughout","to","toward","towards","under",
            "until","up","upon","via","with","within","without",
            "and","but","or","nor","so","yet","if","because","although","though","while","whereas","unless","whether","than","as",
            "what","which","who","whom","whose","when","where","why","how",
            "there","here","yes","please","don't","doesn't","didn't","can't","cannot","won't","isn't","aren't","wasn't",
            "weren't","shouldn't","wouldn't","couldn't","haven't","hasn't","i'm","it's","you're","they're","we're","that's",
        ];
        words.iter().copied().collect()
    };
    static ref AUXILIARIES: HashSet<&'static str> = {
        let words: &[&str] = &[
            "am","is","are","was","were","be","been","being","do","does","did","have","has","had","having",
            "can","could","will","would","shall","should","may","might","must",
        ];
        words.iter().copied().collect()
    };
    static ref VERBS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "get","gets","got","getting","make","makes","made","take","takes","took","taken","feel","feels","felt",
            "find","finds","found","see","sees","seen","saw","need","needs","go","goes","went","gone","going",
            "know","knows","known","include","includes","including","included","become","becomes","became",
            "develop","develops","developed","affect","affects","affected","reduce","reduces","prevent","prevents",
            "happen","happens","occur","occurs","keep","keeps","kept","stop","stops","help","helps","lead","leads",
            "spread","spreads","avoid","try","tries","tell","ask","give","gives","given","say","says","said",
            "think","want","wants","seem","seems","show","shows","call","called","treat","treated","diagnose",
            "diagnosed","recommend","recommended","suffer","suffers","start","starts","improve","improves",
            "contain","contains","let","put","run","runs","live","lives","cure","cured",
        ];
        words.iter().copied().collect()
    };
    static ref ADJECTIVES: HashSet<&'static str> = {
        let words: &[&str] = &[
            "common","severe","mild","high","low","long","short","chronic","acute","serious","rare","different",
            "possible","important","normal","good","bad","better","best","worse","worst","new","old","young","small",
            "large","big","little","early","late","main","same","certain","similar","usual","specific","general",
            "medical","sore","red","swollen","dry","itchy","sudden","persistent","healthy","likely","unlikely",
            "able","sure","free","full","whole","available","necessary","regular","simple","difficult","easy",
            "hard","due","further","local","recent","sick","ill","high-risk","long-term","short-term",
        ];
        words.iter().copied().collect()
    };
    static ref ADVERBS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "also","very","often","usually","sometimes","always","never","just","only","even","still","already",
            "again","too","quite","rather","however","therefore","soon","now","then","away","almost","enough",
            "instead","perhaps","maybe","not","well","together",
        ];
        words.iter().copied().collect()
    };
    /// Nouns ending in -ly that the adverb suffix rule would otherwise swallow.
    static ref LY_NOUNS: HashSet<&'static str> = {
        let words: &[&str] = &["family","belly","supply","anomaly","assembly","ally","reply","lily","jelly","bully"];
        words.iter().copied().collect()
    };
    /// Multi-word nouns kept together as a single token, in root form.
    static ref COMPOUND_NOUNS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "ear infection","blood pressure","high blood pressure","blood sugar","blood test","blood clot",
            "heart attack","heart disease","heart failure","chest pain","back pain","sore throat","kidney stone",
            "kidney disease","lung cancer","breast cancer","skin cancer","bowel cancer","prostate cancer",
            "head louse","food poisoning","hay fever","common cold","immune system","urinary tract infection",
            "chest infection","stomach ache","panic attack","side effect","weight loss",
        ];
        words.iter().copied().collect()
    };
    static ref IRREGULAR_PLURALS: HashMap<&'static str, &'static str> = {
        let pairs: &[(&str, &str)] = &[
            ("children","child"),("feet","foot"),("teeth","tooth"),("men","man"),("women","woman"),("mice","mouse"),
            ("lice","louse"),("geese","goose"),("people","person"),("knives","knife"),("halves","half"),
            ("calves","calf"),("wives","wife"),("lives","life"),("shoes","shoe"),("toes","toe"),
            ("crises","crisis"),("analyses","analysis"),("aches","ache"),("headaches","headache"),
            ("toothaches","toothache"),("stomachaches","stomachache"),("backaches","backache"),
            ("earaches","earache"),("heartaches","heartache"),("bellyaches","bellyache"),
        ];
        pairs.iter().copied().collect()
    };
    /// Singulars ending in "-use" after a consonant, which the "-uses" -> "-us" rule would break.
    static ref USE_NOUNS: HashSet<&'static str> = {
        let words: &[&str] = &["use","abuse","misuse","overuse","excuse","fuse","refuse","recluse"];
        words.iter().copied().collect()
    };
    /// Nouns whose plural-looking form is also their base form.
    static ref INVARIANT_NOUNS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "diabetes","measles","mumps","rabies","herpes","scabies","shingles","rickets","series","species","news",
            "lens","pancreas","aids","genetics","physics","faeces","feces","glasses",
        ];
        words.iter().copied().collect()
    };
}

/// Lexicon and suffix driven tagger: closed word classes are listed, numbers are values,
/// a handful of suffixes mark verbs, adjectives and adverbs, and everything else is a noun.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconAnalyzer;

impl LexiconAnalyzer {
    pub fn new() -> Self { Self }
}

impl Analyzer for LexiconAnalyzer {
    fn terms(&self, text: &str) -> Vec<Term> {
        let normalized: String = text.nfkc().map(|c| if c == '\u{2019}' { '\'' } else { c }).collect();
        let words: Vec<&str> = WORD.find_iter(&normalized).map(|m| m.as_str()).collect();
        let lower: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();

        let mut terms = Vec::with_capacity(words.len());
        let mut i = 0;
        while i < words.len() {
            if let Some(n) = compound_len(&lower[i..]) {
                terms.push(Term { text: words[i..i + n].join(" "), pos: PartOfSpeech::Noun });
                i += n;
                continue;
            }
            let after_aux = i > 0 && AUXILIARIES.contains(lower[i - 1].as_str());
            terms.push(Term { text: words[i].to_string(), pos: tag(&lower[i], after_aux) });
            i += 1;
        }
        terms
    }

    fn noun_root(&self, noun: &str) -> String {
        let lower = noun.to_lowercase();
        let mut words: Vec<&str> = lower.split_whitespace().collect();
        let Some(last) = words.pop() else { return String::new() };
        let last = singularize(strip_possessive(last));
        words.push(&last);
        words.join(" ")
    }
}

fn compound_len(window: &[String]) -> Option<usize> {
    for n in [3, 2] {
        if window.len() < n {
            continue;
        }
        let key = format!("{} {}", window[..n - 1].join(" "), singularize(&window[n - 1]));
        if COMPOUND_NOUNS.contains(key.as_str()) {
            return Some(n);
        }
    }
    None
}

fn tag(word: &str, after_aux: bool) -> PartOfSpeech {
    if word.starts_with(|c: char| c.is_numeric()) {
        return PartOfSpeech::Value;
    }
    if FUNCTION_WORDS.contains(word) {
        return PartOfSpeech::Function;
    }
    let base = strip_possessive(word);
    if AUXILIARIES.contains(base) || VERBS.contains(base) {
        return PartOfSpeech::Verb;
    }
    if ADJECTIVES.contains(base) {
        return PartOfSpeech::Adjective;
    }
    if ADVERBS.contains(base) {
        return PartOfSpeech::Adverb;
    }
    let len = base.chars().count();
    if len > 4 && base.ends_with("ly") && !LY_NOUNS.contains(base) {
        return PartOfSpeech::Adverb;
    }
    if len > 4 && base.ends_with("ed") && !base.ends_with("eed") {
        return PartOfSpeech::Verb;
    }
    if after_aux && len > 4 && base.ends_with("ing") {
        return PartOfSpeech::Verb;
    }
    if len > 5 && ["ous", "ful", "less"].iter().any(|s| base.ends_with(s)) {
        return PartOfSpeech::Adjective;
    }
    PartOfSpeech::Noun
}

fn strip_possessive(word: &str) -> &str {
    ["'s", "\u{2019}s", "'", "\u{2019}"]
        .iter()
        .find_map(|s| word.strip_suffix(s))
        .unwrap_or(word)
}

fn singularize(word: &str) -> String {
    if word.chars().count() <= 3 || INVARIANT_NOUNS.contains(word) {
        return word.to_string();
    }
    if let Some(single) = IRREGULAR_PLURALS.get(word) {
        return single.to_string();
    }
    if ["ss", "us", "is"].iter().any(|s| word.ends_with(s)) {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{stem}y");
    }
    // diagnoses, prognoses, thromboses; short words like doses and noses are ordinary plurals
    if word.chars().count() > 6 && word.ends_with("oses") && !word.ends_with("doses") {
        return format!("{}is", &word[..word.len() - 2]);
    }
    if let Some(stem) = word.strip_suffix("uses") {
        let with_e = format!("{stem}use");
        if USE_NOUNS.contains(with_e.as_str()) || stem.ends_with(|c: char| "aeio".contains(c)) {
            return with_e;
        }
        return format!("{stem}us");
    }
    if ["sses", "shes", "ches", "xes", "zes"].iter().any(|s| word.ends_with(s)) {
        return word[..word.len() - 2].to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => word.to_string(),
    }
}
