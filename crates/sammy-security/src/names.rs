//! Random `adjective_surname` pseudonyms

use rand::Rng;

use crate::PseudonymGenerator;

const LEFT: &[&str] = &[
    "admiring", "adoring", "affectionate", "agitated", "amazing", "angry", "awesome",
    "beautiful", "blissful", "bold", "boring", "brave", "busy", "charming", "clever",
    "compassionate", "competent", "condescending", "confident", "cool", "cranky", "crazy",
    "dazzling", "determined", "distracted", "dreamy", "eager", "ecstatic", "elastic",
    "elated", "elegant", "eloquent", "epic", "exciting", "fervent", "festive", "flamboyant",
    "focused", "friendly", "frosty", "funny", "gallant", "gifted", "goofy", "gracious",
    "great", "happy", "hardcore", "heuristic", "hopeful", "hungry", "infallible", "inspiring",
    "intelligent", "interesting", "jolly", "jovial", "keen", "kind", "laughing", "loving",
    "lucid", "magical", "modest", "musing", "mystifying", "naughty", "nervous", "nice",
    "nifty", "nostalgic", "objective", "optimistic", "peaceful", "pedantic", "pensive",
    "practical", "priceless", "quirky", "quizzical", "recursing", "relaxed", "reverent",
    "romantic", "sad", "serene", "sharp", "silly", "sleepy", "stoic", "strange", "stupefied",
    "suspicious", "sweet", "tender", "thirsty", "trusting", "unruffled", "upbeat", "vibrant",
    "vigilant", "vigorous", "wizardly", "wonderful", "xenodochial", "youthful", "zealous",
    "zen",
];

const RIGHT: &[&str] = &[
    "agnesi", "albattani", "allen", "almeida", "archimedes", "ardinghelli", "aryabhata",
    "austin", "babbage", "banach", "bardeen", "bartik", "bassi", "bell", "benz", "bhabha",
    "bhaskara", "blackwell", "bohr", "booth", "borg", "bose", "boyd", "brahmagupta",
    "brattain", "brown", "carson", "cerf", "chandrasekhar", "chaplygin", "chatelet",
    "chatterjee", "chebyshev", "cohen", "colden", "cori", "cray", "curie", "darwin",
    "davinci", "dijkstra", "dubinsky", "easley", "edison", "einstein", "elion", "engelbart",
    "euclid", "euler", "faraday", "feistel", "fermat", "fermi", "feynman", "franklin",
    "gagarin", "galileo", "gates", "gauss", "germain", "goldberg", "goldstine", "goldwasser",
    "goodall", "haibt", "hamilton", "hawking", "heisenberg", "hermann", "hodgkin", "hoover",
    "hopper", "hugle", "hypatia", "jackson", "jang", "jennings", "jepsen", "johnson",
    "joliot", "jones", "kalam", "kapitsa", "kare", "keldysh", "keller", "kepler", "khorana",
    "kilby", "kirch", "knuth", "kowalevski", "lalande", "lamarr", "lamport", "leakey",
    "leavitt", "lederberg", "lehmann", "lewin", "lichterman", "liskov", "lovelace",
    "lumiere", "mahavira", "margulis", "matsumoto", "maxwell", "mayer", "mccarthy",
    "mcclintock", "mclean", "mcnulty", "meitner", "mendel", "mendeleev", "merkle", "mestorf",
    "mirzakhani", "moore", "morse", "murdock", "napier", "nash", "neumann", "newton",
    "nightingale", "nobel", "noether", "northcutt", "noyce", "panini", "pare", "pascal",
    "pasteur", "payne", "perlman", "pike", "poincare", "poitras", "ptolemy", "raman",
    "ramanujan", "ride", "ritchie", "robinson", "roentgen", "rosalind", "rubin", "saha",
    "sammet", "sanderson", "shannon", "shaw", "shirley", "shockley", "sinoussi", "snyder",
    "spence", "stallman", "stonebraker", "swanson", "swartz", "swirles", "taussig", "tesla",
    "tharp", "thompson", "torvalds", "turing", "varahamihira", "vaughan", "villani",
    "visvesvaraya", "volhard", "wescoff", "wiles", "williams", "wilson", "wing", "wozniak",
    "wright", "wu", "yalow", "yonath", "zhukovsky",
];

/// Generates names like `focused_turing`; retries get a trailing digit
#[derive(Debug, Clone, Copy, Default)]
pub struct NamesGenerator;

impl NamesGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn random_name(attempt: u32) -> String {
        let mut rng = rand::rng();
        loop {
            let left = LEFT[rng.random_range(0..LEFT.len())];
            let right = RIGHT[rng.random_range(0..RIGHT.len())];
            // Steve Wozniak is not boring
            if left == "boring" && right == "wozniak" {
                continue;
            }
            return if attempt > 0 {
                format!("{}_{}{}", left, right, rng.random_range(0..10))
            } else {
                format!("{}_{}", left, right)
            };
        }
    }
}

impl PseudonymGenerator for NamesGenerator {
    fn generate(&self, _token: &str, attempt: u32) -> String {
        Self::random_name(attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_shape() {
        for _ in 0..100 {
            let name = NamesGenerator::random_name(0);
            let (left, right) = name.split_once('_').unwrap();
            assert!(LEFT.contains(&left));
            assert!(RIGHT.contains(&right));
            assert_ne!(name, "boring_wozniak");
        }
    }

    #[test]
    fn test_retry_appends_digit() {
        let name = NamesGenerator::new().generate("anything", 3);
        assert!(name.chars().last().unwrap().is_ascii_digit());
    }
}
