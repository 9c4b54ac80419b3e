// ID3v1 genre table, also used for numeric genres in ID3v2 tags

/// Genre names indexed by their ID3v1 genre byte.
pub const GENRES: [&str; 148] = [
    "Blues", "Classic Rock", "Country", "Dance",
    "Disco", "Funk", "Grunge", "Hip-Hop",
    "Jazz", "Metal", "New Age", "Oldies",
    "Other", "Pop", "R&B", "Rap",
    "Reggae", "Rock", "Techno", "Industrial",
    "Alternative", "Ska", "Death Metal", "Pranks",
    "Soundtrack", "Euro-Techno", "Ambient", "Trip-Hop",
    "Vocal", "Jazz+Funk", "Fusion", "Trance",
    "Classical", "Instrumental", "Acid", "House",
    "Game", "Sound Clip", "Gospel", "Noise",
    "Alt Rock", "Bass", "Soul", "Punk",
    "Space", "Meditative", "Instrumental Pop", "Instrumental Rock",
    "Ethnic", "Gothic", "Darkwave", "Techno-Industrial",
    "Electronic", "Pop-Folk", "Eurodance", "Dream",
    "Southern Rock", "Comedy", "Cult", "Gangsta",
    "Top 40", "Christian Rap", "Pop/Funk", "Jungle",
    "Native American", "Cabaret", "New Wave", "Psychadelic",
    "Rave", "Showtunes", "Trailer", "Lo-Fi",
    "Tribal", "Acid Punk", "Acid Jazz", "Polka",
    "Retro", "Musical", "Rock & Roll", "Hard Rock",
    "Folk", "Folk-Rock", "National Folk", "Swing",
    "Fast Fusion", "Bebob", "Latin", "Revival",
    "Celtic", "Bluegrass", "Avantgarde", "Gothic Rock",
    "Progressive Rock", "Psychedelic Rock", "Symphonic Rock", "Slow Rock",
    "Big Band", "Chorus", "Easy Listening", "Acoustic",
    "Humour", "Speech", "Chanson", "Opera",
    "Chamber Music", "Sonata", "Symphony", "Booty Bass",
    "Primus", "Porn Groove", "Satire", "Slow Jam",
    "Club", "Tango", "Samba", "Folklore",
    "Ballad", "Power Ballad", "Rhythmic Soul", "Freestyle",
    "Duet", "Punk Rock", "Drum Solo", "A capella",
    "Euro-House", "Dance Hall", "Goa", "Drum & Bass",
    "Club-House", "Hardcore", "Terror", "Indie",
    "BritPop", "Negerpunk", "Polsk Punk", "Beat",
    "Christian Gangsta Rap", "Heavy Metal", "Black Metal", "Crossover",
    "Contemporary Christian", "Christian Rock", "Merengue", "Salsa",
    "Thrash Metal", "Anime", "JPop", "Synthpop",
];

/// Name for a genre index, if it is in the table.
pub fn genre_name(index: i32) -> Option<&'static str> {
    usize::try_from(index).ok().and_then(|i| GENRES.get(i)).copied()
}

/// Case-insensitive lookup of a genre name.
pub fn match_genre_description(description: &str) -> Option<u8> {
    let description = description.trim();
    GENRES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(description))
        .map(|index| index as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_positions() {
        assert_eq!(genre_name(0), Some("Blues"));
        assert_eq!(genre_name(8), Some("Jazz"));
        assert_eq!(genre_name(13), Some("Pop"));
        assert_eq!(genre_name(137), Some("Heavy Metal"));
        assert_eq!(genre_name(147), Some("Synthpop"));
        assert_eq!(genre_name(148), None);
        assert_eq!(genre_name(-1), None);
    }

    #[test]
    fn test_match_description() {
        assert_eq!(match_genre_description("jazz"), Some(8));
        assert_eq!(match_genre_description("ALT ROCK"), Some(40));
        assert_eq!(match_genre_description("Bebob"), Some(85));
        assert_eq!(match_genre_description("Not a genre"), None);
    }
}
