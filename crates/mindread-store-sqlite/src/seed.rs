//! Sample catalogue for a fresh store: ten well-known movies, three of them
//! with curated trivia at every tier.

use mindread_core::{
  movie::{Actor, Director, NewMovie, Studio},
  store::MovieStore,
  trivia::{NewTrivia, Tier},
};

use crate::{Result, SqliteStore};

struct SampleMovie {
  title:    &'static str,
  year:     i32,
  director: (&'static str, &'static str),
  studio:   (&'static str, &'static str),
  rating:   f64,
  actors:   &'static [&'static str],
  genres:   &'static [&'static str],
  /// Hard, medium and easy facts.
  trivia:   Option<[&'static [&'static str]; 3]>,
}

const CATALOGUE: &[SampleMovie] = &[
  SampleMovie {
    title:    "Inception",
    year:     2010,
    director: ("Christopher Nolan", "Following"),
    studio:   ("Warner Bros.", "4000 Warner Blvd, Burbank, CA"),
    rating:   8.8,
    actors:   &["Leonardo DiCaprio"],
    genres:   &["Sci-Fi", "Action", "Thriller"],
    trivia:   Some([
      &[
        "The snow fortress sequence was filmed in Calgary, Alberta",
        "The character Mal is named after the French word for 'bad'",
        "The runtime is exactly 2 hours and 28 minutes",
      ],
      &[
        "The movie's tagline was 'Your mind is the scene of the crime'",
        "Hans Zimmer composed the iconic soundtrack",
        "The spinning top is a recurring symbol",
      ],
      &[
        "This movie was released in 2010",
        "Leonardo DiCaprio plays the main character",
        "The movie is about dreams",
      ],
    ]),
  },
  SampleMovie {
    title:    "Jurassic Park",
    year:     1993,
    director: ("Steven Spielberg", "Duel"),
    studio:   ("Universal Pictures", "100 Universal City Plaza, Universal City, CA"),
    rating:   8.2,
    actors:   &["Sam Neill"],
    genres:   &["Adventure", "Sci-Fi", "Thriller"],
    trivia:   Some([
      &[
        "The velociraptor sounds were created using tortoises mating",
        "Hurricane Iniki hit during filming in Hawaii",
        "The T-Rex roar was made from a baby elephant's sound",
      ],
      &[
        "The T-Rex animatronic sometimes malfunctioned due to rain",
        "The raptor sounds were a mix of various animal noises",
        "The movie was based on a Michael Crichton novel",
      ],
      &[
        "This movie features dinosaurs",
        "It was released in 1993",
        "The movie takes place on an island",
      ],
    ]),
  },
  SampleMovie {
    title:    "Pulp Fiction",
    year:     1994,
    director: ("Quentin Tarantino", "Reservoir Dogs"),
    studio:   ("Miramax", "1901 Avenue of the Stars, Los Angeles, CA"),
    rating:   8.9,
    actors:   &["John Travolta"],
    genres:   &["Crime", "Drama", "Thriller"],
    trivia:   None,
  },
  SampleMovie {
    title:    "Goodfellas",
    year:     1990,
    director: ("Martin Scorsese", "Who's That Knocking at My Door"),
    studio:   ("Warner Bros.", "4000 Warner Blvd, Burbank, CA"),
    rating:   8.7,
    actors:   &["Robert De Niro"],
    genres:   &["Crime", "Drama", "Biography"],
    trivia:   None,
  },
  SampleMovie {
    title:    "Titanic",
    year:     1997,
    director: ("James Cameron", "Piranha II: The Spawning"),
    studio:   ("Paramount Pictures", "5555 Melrose Avenue, Hollywood, CA"),
    rating:   7.9,
    actors:   &["Leonardo DiCaprio", "Kate Winslet"],
    genres:   &["Drama", "Romance", "History"],
    trivia:   None,
  },
  SampleMovie {
    title:    "Alien",
    year:     1979,
    director: ("Ridley Scott", "The Duellists"),
    studio:   ("20th Century Studios", "10201 West Pico Blvd., Los Angeles, CA"),
    rating:   8.5,
    actors:   &["Sigourney Weaver"],
    genres:   &["Horror", "Sci-Fi", "Thriller"],
    trivia:   None,
  },
  SampleMovie {
    title:    "The Lord of the Rings: The Fellowship of the Ring",
    year:     2001,
    director: ("Peter Jackson", "Bad Taste"),
    studio:   ("New Line Cinema", "4000 Warner Boulevard, Burbank, CA"),
    rating:   8.9,
    actors:   &["Elijah Wood"],
    genres:   &["Fantasy", "Adventure", "Drama"],
    trivia:   None,
  },
  SampleMovie {
    title:    "The Dark Knight",
    year:     2008,
    director: ("Christopher Nolan", "Following"),
    studio:   ("Warner Bros.", "4000 Warner Blvd, Burbank, CA"),
    rating:   9.0,
    actors:   &["Christian Bale"],
    genres:   &["Action", "Crime", "Drama"],
    trivia:   Some([
      &[
        "The hospital explosion was real and done in one take",
        "The Joker's scars change stories throughout the film",
        "The IMAX cameras used were so loud that dialogue had to be re-recorded",
      ],
      &[
        "The movie was partially filmed in Chicago",
        "Heath Ledger won a posthumous Oscar",
        "The Batpod was a fully functional vehicle",
      ],
      &[
        "This movie features Batman",
        "It was released in 2008",
        "Heath Ledger plays the Joker",
      ],
    ]),
  },
  SampleMovie {
    title:    "Gladiator",
    year:     2000,
    director: ("Ridley Scott", "The Duellists"),
    studio:   ("Universal Pictures", "100 Universal City Plaza, Universal City, CA"),
    rating:   8.5,
    actors:   &["Russell Crowe"],
    genres:   &["Action", "Drama", "History"],
    trivia:   None,
  },
  SampleMovie {
    title:    "Avatar",
    year:     2009,
    director: ("James Cameron", "Piranha II: The Spawning"),
    studio:   ("20th Century Studios", "10201 West Pico Blvd., Los Angeles, CA"),
    rating:   7.9,
    actors:   &["Sigourney Weaver", "Zoe Saldana"],
    genres:   &["Sci-Fi", "Action", "Adventure"],
    trivia:   None,
  },
];

impl SqliteStore {
  /// Insert the sample catalogue if the store has no movies yet.
  ///
  /// Returns the number of movies inserted (zero when the store was already
  /// populated).
  pub async fn seed_sample_catalogue(&self) -> Result<usize> {
    if self.movie_count().await? > 0 {
      tracing::info!("store already has movies, skipping sample catalogue");
      return Ok(0);
    }

    for sample in CATALOGUE {
      let movie = self
        .add_movie(NewMovie {
          year: Some(sample.year),
          genres: sample.genres.iter().map(|g| (*g).to_owned()).collect(),
          director: Some(Director {
            name:        sample.director.0.to_owned(),
            debut_movie: Some(sample.director.1.to_owned()),
          }),
          studio: Some(Studio {
            name:    sample.studio.0.to_owned(),
            address: Some(sample.studio.1.to_owned()),
          }),
          imdb_rating: Some(sample.rating),
          actors: sample
            .actors
            .iter()
            .map(|a| Actor { name: (*a).to_owned() })
            .collect(),
          ..NewMovie::new(sample.title)
        })
        .await?;

      if let Some(tiers) = &sample.trivia {
        for (tier, facts) in Tier::ALL.into_iter().zip(tiers) {
          for text in facts.iter() {
            self.add_trivia(NewTrivia::new(movie.movie_id, tier, *text)).await?;
          }
        }
      }
    }

    tracing::info!(movies = CATALOGUE.len(), "seeded sample catalogue");
    Ok(CATALOGUE.len())
  }
}
