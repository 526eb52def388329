// Built-in hotel reviews used to seed the knowledge graph

pub const SAMPLE_HOTEL_REVIEWS: &[&str] = &[
    "The Creek Hotel in Dubai offers comfortable accommodations with amenities like a sofa, TV, \
     and hot-shower bath. It caters to both Businessmen and Tourists. Ryouta Sato, who recently \
     stayed there, found the service excellent.",
    "The Buckingham Hotel in New York City provides a cozy atmosphere with a sofa, TV, and \
     hot-shower bath. Issac Collett, a recent guest, praised the hotel's convenient location.",
    "The Buckingham Hotel, located in London, UK, offers a unique British experience. Akiko \
     Kaneko mentioned the authentic English breakfast in her review.",
    "The Kensington Hotel in Oslo received a positive review from Hsiung Chuang, who appreciated \
     the Scandinavian design elements.",
    "The Deira Hotel in Beijing features 3 restaurants offering various cuisines. Reina Inoue \
     recommended trying the local specialties during her stay.",
];

pub fn sample_reviews() -> Vec<String> {
    SAMPLE_HOTEL_REVIEWS.iter().map(|r| r.to_string()).collect()
}
