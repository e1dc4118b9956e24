//! Adapter for the mobile site of musor.tv (`m.musor.tv`)
//!
//! Daily listings are fetched from
//! `https://m.musor.tv/napi/tvmusor/{channel}/{YYYY.MM.DD}`, one page per
//! channel and day. Every listed program links to a details page carrying
//! an image and a long description with cast and crew.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, trace};
use url::Url;

use super::traits::EpgSiteAdapter;
use crate::config::SiteOptions;
use crate::errors::{AppError, AppResult, FetchError, FetchResult};
use crate::models::{Channel, Credits, EpisodeNum, LocalizedText, Program};
use crate::utils::HttpSession;

const BASE_URL: &str = "https://m.musor.tv";
const LISTING_LANG: &str = "hu";
const ORIGINAL_TITLE_LANG: &str = "en";

const DIRECTOR_MARKERS: [&str; 2] = ["Rendezte:", "Rendező:"];
const CAST_MARKER: &str = "Főszereplők:";

pub struct MusorTvAdapter {
    session: HttpSession,
    parser: MusorTvParser,
}

impl MusorTvAdapter {
    pub const SITE_ID: &'static str = "m.musor.tv";

    pub fn new(options: &SiteOptions) -> AppResult<Self> {
        Ok(Self {
            session: HttpSession::new(options)?,
            parser: MusorTvParser::new(BASE_URL, options.timezone)?,
        })
    }

    pub fn day_url(&self, site_local_id: &str, date: NaiveDate) -> String {
        self.parser.day_url(site_local_id, date)
    }

    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.parser.timezone).date_naive()
    }
}

#[async_trait]
impl EpgSiteAdapter for MusorTvAdapter {
    fn site_id(&self) -> &str {
        Self::SITE_ID
    }

    async fn fetch_channel(&self, site_local_id: &str, display_name: &str) -> FetchResult<Channel> {
        self.fetch_channel_for_day(site_local_id, display_name, self.today())
            .await
    }

    async fn fetch_channel_for_day(
        &self,
        site_local_id: &str,
        display_name: &str,
        date: NaiveDate,
    ) -> FetchResult<Channel> {
        let url = self.day_url(site_local_id, date);
        let page = self.session.get_text(&url).await?;
        Ok(self.parser.parse_channel(&page, site_local_id, display_name))
    }

    async fn fetch_programs(
        &self,
        channel: &Channel,
        site_local_id: &str,
        date: NaiveDate,
    ) -> FetchResult<Vec<Program>> {
        let url = self.day_url(site_local_id, date);
        let page = self.session.get_text(&url).await?;
        let listings = self.parser.parse_day_page(&page, &channel.id, date)?;

        let mut programs = Vec::with_capacity(listings.len());
        for listing in listings {
            let mut program = listing.program;
            if let Some(details_url) = listing.details_url {
                let details = self.session.get_text(&details_url).await?;
                self.parser.apply_details(&mut program, &details);
            }
            trace!(
                "New program CH: {} P: {}",
                program.channel,
                program.primary_title().unwrap_or_default()
            );
            programs.push(program);
        }

        debug!(
            "Fetched {} programs for {} on {}",
            programs.len(),
            channel.id,
            date
        );
        Ok(programs)
    }
}

/// A program read from a daily listing, before its details page is applied
#[derive(Debug, Clone, PartialEq)]
pub struct ListingEntry {
    pub program: Program,
    pub details_url: Option<String>,
}

/// Fields extracted from a details page long description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LongDescription {
    pub original_title: Option<String>,
    pub sub_title: Option<String>,
    pub description: Option<String>,
    pub credits: Credits,
}

/// Synchronous page parsing
///
/// Parse trees are built and dropped inside each method, so nothing
/// returned here borrows from the HTML.
pub struct MusorTvParser {
    base_url: Url,
    timezone: Tz,
    channel_logo: Selector,
    program: Selector,
    title: Selector,
    start: Selector,
    description: Selector,
    details_link: Selector,
    details_image: Selector,
    long_description: Selector,
    season_episode: Regex,
    single_episode: Regex,
    name_separator: Regex,
}

impl MusorTvParser {
    pub fn new(base_url: &str, timezone: Tz) -> AppResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::configuration(format!("Invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            base_url,
            timezone,
            channel_logo: selector("img.channelheaderlink")?,
            program: selector("section[itemscope]")?,
            title: selector(r#"[itemprop="name"]"#)?,
            start: selector(r#"span[itemprop="startDate"]"#)?,
            description: selector(r#"div[itemprop="description"]"#)?,
            details_link: selector("h3.wideprogentry_progtitle > a")?,
            details_image: selector(r#"img[itemprop="image"]"#)?,
            long_description: selector("div.eventinfolongdescinner")?,
            season_episode: regex(r"([MDCLXVI]+)\./([0-9]+)\.")?,
            single_episode: regex(r"([0-9]+)\.")?,
            name_separator: regex(r"[,;]+ ")?,
        })
    }

    pub fn day_url(&self, site_local_id: &str, date: NaiveDate) -> String {
        format!(
            "{}napi/tvmusor/{}/{}",
            self.base_url,
            site_local_id,
            date.format("%Y.%m.%d")
        )
    }

    pub fn channel_id(site_local_id: &str) -> String {
        format!("{}.{}", site_local_id, MusorTvAdapter::SITE_ID).to_uppercase()
    }

    pub fn parse_channel(&self, page: &str, site_local_id: &str, display_name: &str) -> Channel {
        let document = Html::parse_document(page);

        let mut channel = Channel::new(Self::channel_id(site_local_id));
        if !display_name.is_empty() {
            channel = channel.with_display_name(display_name);
        }

        let logo = document
            .select(&self.channel_logo)
            .next()
            .and_then(|img| img.value().attr("src"))
            .and_then(|src| self.absolute_url(src));
        if let Some(logo) = logo {
            channel = channel.with_icon(logo);
        }

        channel
    }

    /// Programs listed on a daily page that start on `date` in local time
    pub fn parse_day_page(
        &self,
        page: &str,
        channel_id: &str,
        date: NaiveDate,
    ) -> FetchResult<Vec<ListingEntry>> {
        let document = Html::parse_document(page);
        let mut entries = Vec::new();

        for section in document.select(&self.program) {
            let entry = self.parse_listing(section, channel_id)?;
            if entry.program.start.date_naive() != date {
                trace!(
                    "Skipping '{}' starting {} outside {}",
                    entry.program.primary_title().unwrap_or_default(),
                    entry.program.start,
                    date
                );
                continue;
            }
            entries.push(entry);
        }

        Ok(entries)
    }

    fn parse_listing(&self, section: ElementRef<'_>, channel_id: &str) -> FetchResult<ListingEntry> {
        let raw_title = section
            .select(&self.title)
            .next()
            .map(stripped_text)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| self.parse_error("program without a title"))?;

        let start_content = section
            .select(&self.start)
            .next()
            .and_then(|span| span.value().attr("content"))
            .ok_or_else(|| self.parse_error(format!("'{raw_title}' has no start time")))?;
        let start = self.parse_start(start_content).ok_or_else(|| {
            self.parse_error(format!("'{raw_title}' has an unreadable start time '{start_content}'"))
        })?;

        let (title, episode_nums) = self.split_episode_info(&raw_title);
        let mut program = Program::new(
            channel_id,
            LocalizedText::with_lang(title, LISTING_LANG),
            start,
        );
        program.episode_nums = episode_nums;

        if let Some(description) = section.select(&self.description).next() {
            apply_sub_title_and_year(&mut program, &stripped_text(description));
        }

        let details_url = section
            .select(&self.details_link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| self.absolute_url(href));

        Ok(ListingEntry {
            program,
            details_url,
        })
    }

    /// Merge the image and long description of a details page into `program`
    pub fn apply_details(&self, program: &mut Program, page: &str) {
        let document = Html::parse_document(page);

        let icon = document
            .select(&self.details_image)
            .next()
            .and_then(|img| img.value().attr("src"))
            .and_then(|src| self.absolute_url(src));
        if let Some(icon) = icon {
            program.icons = vec![icon];
        }

        let text = document
            .select(&self.long_description)
            .next()
            .map(clean_text)
            .unwrap_or_default();
        let long = self.split_long_description(text.trim());

        if let Some(original_title) = long.original_title {
            program
                .titles
                .push(LocalizedText::with_lang(original_title, ORIGINAL_TITLE_LANG));
        }
        if let Some(sub_title) = long.sub_title {
            program.sub_titles.push(LocalizedText::new(sub_title));
        }
        if let Some(description) = long.description {
            program.descriptions.push(LocalizedText::new(description));
        }
        if !long.credits.is_empty() {
            program.credits = Some(long.credits);
        }
    }

    /// Split a long description into original title, sub-title, description
    /// and credits
    ///
    /// Layout, every part optional:
    ///
    /// ```text
    /// (Original Title)
    ///
    /// Sub-title
    ///
    /// Description...
    /// Rendezte: Director
    /// Főszereplők: Actor, Actor; Actor
    /// ```
    pub fn split_long_description(&self, text: &str) -> LongDescription {
        let mut long = LongDescription::default();
        if text.is_empty() {
            return long;
        }
        if text.lines().count() == 1 {
            long.description = Some(text.to_string());
            return long;
        }

        let mut rest = text;
        if let Some(inner) = rest.strip_prefix('(') {
            if let Some(end) = inner.find(")\n\n") {
                long.original_title = Some(inner[..end].trim().to_string()).filter(|t| !t.is_empty());
                rest = &inner[end + 3..];
            }
        }

        let director = DIRECTOR_MARKERS
            .iter()
            .filter_map(|marker| rest.find(marker).map(|pos| (pos, marker.len())))
            .min();
        let cast = rest.find(CAST_MARKER);
        let body_end = [director.map(|(pos, _)| pos), cast]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(rest.len());

        let body = rest[..body_end].trim();
        let parts: Vec<&str> = body.split("\n\n").collect();
        if parts.len() >= 2 {
            long.sub_title = Some(parts[0].trim().to_string());
            let description = parts[1..].join("\n");
            let description = description.trim();
            if !description.is_empty() {
                long.description = Some(description.to_string());
            }
        } else if !body.is_empty() {
            long.description = Some(body.to_string());
        }

        if let Some((pos, len)) = director {
            let end = cast.filter(|c| *c > pos).unwrap_or(rest.len());
            long.credits.directors = self.split_names(&rest[pos + len..end]);
        }
        if let Some(pos) = cast {
            long.credits.actors = self.split_names(&rest[pos + CAST_MARKER.len()..]);
        }

        long
    }

    /// Cut a `II./12.` or `12.` episode marker from a title
    ///
    /// Returns the shortened title and `onscreen` plus `xmltv_ns` episode
    /// numbers. Titles without a marker come back unchanged.
    pub fn split_episode_info(&self, title: &str) -> (String, Vec<EpisodeNum>) {
        let season_match = self.season_episode.captures_iter(title).find_map(|caps| {
            let whole = caps.get(0)?;
            let season = from_roman(caps.get(1)?.as_str())?;
            let episode = caps.get(2)?.as_str().parse::<u32>().ok()?;
            Some((whole.start(), Some(season), episode))
        });
        let marker = season_match.or_else(|| {
            self.single_episode.captures_iter(title).find_map(|caps| {
                let whole = caps.get(0)?;
                let episode = caps.get(1)?.as_str().parse::<u32>().ok()?;
                Some((whole.start(), None, episode))
            })
        });

        let Some((cut, season, episode)) = marker else {
            return (title.to_string(), Vec::new());
        };
        if episode == 0 {
            return (title.to_string(), Vec::new());
        }

        let (onscreen, xmltv_ns) = match season {
            Some(season) => (
                format!("S{season:02}E{episode:02}"),
                format!("{}.{}.", season - 1, episode - 1),
            ),
            None => (format!("S--E{episode:02}"), format!(".{}.", episode - 1)),
        };

        let short = title[..cut].trim();
        let short = if short.is_empty() { title.trim() } else { short };

        (
            short.to_string(),
            vec![
                EpisodeNum::new("onscreen", onscreen),
                EpisodeNum::new("xmltv_ns", xmltv_ns),
            ],
        )
    }

    /// Start times are UTC with `GMT` as the date/time separator
    fn parse_start(&self, content: &str) -> Option<DateTime<FixedOffset>> {
        let normalized = content.trim().replace("GMT", "T");

        if let Ok(with_offset) = DateTime::parse_from_rfc3339(&normalized) {
            return Some(with_offset.with_timezone(&self.timezone).fixed_offset());
        }

        ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(&normalized, format).ok())
            .map(|naive| naive.and_utc().with_timezone(&self.timezone).fixed_offset())
    }

    fn split_names(&self, names: &str) -> Vec<String> {
        self.name_separator
            .split(names.trim())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn absolute_url(&self, href: &str) -> Option<String> {
        self.base_url.join(href.trim()).ok().map(String::from)
    }

    fn parse_error<M: Into<String>>(&self, message: M) -> FetchError {
        FetchError::parse(MusorTvAdapter::SITE_ID, message)
    }
}

/// `Sub-title, 2005-2010` style listing descriptions
///
/// The last comma-separated part is the production year (end year of a
/// range); a lone number is just the year.
fn apply_sub_title_and_year(program: &mut Program, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }

    match text.rsplit_once(',') {
        Some((sub_title, year)) => {
            let year = year.rsplit('-').next().unwrap_or(year).trim();
            if !year.is_empty() {
                program.date = Some(year.to_string());
            }
            let sub_title = sub_title.trim();
            if !sub_title.is_empty() {
                program
                    .sub_titles
                    .insert(0, LocalizedText::with_lang(sub_title, LISTING_LANG));
            }
        }
        None if text.chars().all(|c| c.is_ascii_digit()) => {
            program.date = Some(text.to_string());
        }
        None => program.sub_titles.push(LocalizedText::new(text)),
    }
}

/// Concatenated, individually trimmed text nodes
fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// Like [`stripped_text`], with `<br>` turned into newlines
fn clean_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t.trim()),
            Node::Element(e) if e.name() == "br" => text.push('\n'),
            _ => {}
        }
    }
    text
}

fn from_roman(numeral: &str) -> Option<u32> {
    fn value(c: char) -> Option<u32> {
        Some(match c {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => return None,
        })
    }

    let values = numeral.chars().map(value).collect::<Option<Vec<_>>>()?;
    let mut total = 0;
    for (i, v) in values.iter().enumerate() {
        match values.get(i + 1) {
            Some(next) if next > v => total -= *v as i64,
            _ => total += *v as i64,
        }
    }

    let total = u32::try_from(total).ok().filter(|t| *t > 0)?;
    (to_roman(total) == numeral).then_some(total)
}

fn to_roman(mut number: u32) -> String {
    const NUMERALS: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut roman = String::new();
    for (value, numeral) in NUMERALS {
        while number >= value {
            roman.push_str(numeral);
            number -= value;
        }
    }
    roman
}

fn selector(css: &str) -> AppResult<Selector> {
    Selector::parse(css).map_err(|e| AppError::internal(format!("Invalid selector '{css}': {e}")))
}

fn regex(pattern: &str) -> AppResult<Regex> {
    Regex::new(pattern).map_err(|e| AppError::internal(format!("Invalid pattern '{pattern}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const DAY_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
  <div class="channelheader">
    <img class="channelheaderlink" src="/images/channels/rtl.png" alt="RTL">
  </div>
  <section itemscope itemtype="http://schema.org/BroadcastEvent">
    <span itemprop="startDate" content="2024-02-29GMT22:30:00"></span>
    <h3 class="wideprogentry_progtitle"><a href="/mus/late/1"><span itemprop="name">Késő esti film</span></a></h3>
  </section>
  <section itemscope itemtype="http://schema.org/BroadcastEvent">
    <span itemprop="startDate" content="2024-03-01GMT05:00:00"></span>
    <h3 class="wideprogentry_progtitle"><a href="/mus/hirado/2"><span itemprop="name">Híradó</span></a></h3>
    <div itemprop="description">2024</div>
  </section>
  <section itemscope itemtype="http://schema.org/BroadcastEvent">
    <span itemprop="startDate" content="2024-03-01GMT19:00:00"></span>
    <h3 class="wideprogentry_progtitle"><a href="/mus/doktor-house/3"><span itemprop="name">Doktor House II./12.</span></a></h3>
    <div itemprop="description">Amerikai filmsorozat, 2004-2012</div>
  </section>
</body></html>"#;

    const DETAILS_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
  <img itemprop="image" src="/images/events/house.jpg">
  <div class="eventinfolongdesc"><div class="eventinfolongdescinner">(House M.D.)<br><br>Kórház<br><br>A csapat egy rejtélyes esetet vizsgál.<br>Második sor.<br>Rendezte: Greg Yaitanes<br>Főszereplők: Hugh Laurie, Lisa Edelstein; Omar Epps</div></div>
</body></html>"#;

    fn parser() -> MusorTvParser {
        MusorTvParser::new(BASE_URL, chrono_tz::Europe::Budapest).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_url_and_channel_id() {
        let parser = parser();
        assert_eq!(
            parser.day_url("rtl", date(2024, 3, 1)),
            "https://m.musor.tv/napi/tvmusor/rtl/2024.03.01"
        );
        assert_eq!(MusorTvParser::channel_id("rtl"), "RTL.M.MUSOR.TV");
    }

    #[test]
    fn test_parse_channel() {
        let channel = parser().parse_channel(DAY_PAGE, "rtl", "RTL Klub");

        assert_eq!(channel.id, "RTL.M.MUSOR.TV");
        assert_eq!(channel.display_names, vec![LocalizedText::new("RTL Klub")]);
        assert_eq!(
            channel.icon.as_deref(),
            Some("https://m.musor.tv/images/channels/rtl.png")
        );
    }

    #[test]
    fn test_parse_day_page_skips_other_days() {
        let entries = parser()
            .parse_day_page(DAY_PAGE, "RTL.M.MUSOR.TV", date(2024, 3, 1))
            .unwrap();

        assert_eq!(entries.len(), 2);

        let news = &entries[0].program;
        assert_eq!(news.channel, "RTL.M.MUSOR.TV");
        assert_eq!(news.primary_title(), Some("Híradó"));
        assert_eq!(news.start.to_rfc3339(), "2024-03-01T06:00:00+01:00");
        assert_eq!(news.date.as_deref(), Some("2024"));
        assert!(news.sub_titles.is_empty());
        assert_eq!(
            entries[0].details_url.as_deref(),
            Some("https://m.musor.tv/mus/hirado/2")
        );

        let house = &entries[1].program;
        assert_eq!(house.titles, vec![LocalizedText::with_lang("Doktor House", "hu")]);
        assert_eq!(house.start.to_rfc3339(), "2024-03-01T20:00:00+01:00");
        assert_eq!(house.date.as_deref(), Some("2012"));
        assert_eq!(
            house.sub_titles,
            vec![LocalizedText::with_lang("Amerikai filmsorozat", "hu")]
        );
        assert_eq!(
            house.episode_nums,
            vec![
                EpisodeNum::new("onscreen", "S02E12"),
                EpisodeNum::new("xmltv_ns", "1.11."),
            ]
        );
        assert_eq!(house.stop, None);
    }

    #[test]
    fn test_missing_title_is_parse_error() {
        let page = r#"<section itemscope><span itemprop="startDate" content="2024-03-01GMT05:00:00"></span></section>"#;
        let err = parser()
            .parse_day_page(page, "RTL.M.MUSOR.TV", date(2024, 3, 1))
            .unwrap_err();
        assert!(matches!(err, FetchError::Parse { .. }));
    }

    #[test]
    fn test_apply_details() {
        let parser = parser();
        let mut entries = parser
            .parse_day_page(DAY_PAGE, "RTL.M.MUSOR.TV", date(2024, 3, 1))
            .unwrap();
        let mut house = entries.remove(1).program;

        parser.apply_details(&mut house, DETAILS_PAGE);

        assert_eq!(house.icons, vec!["https://m.musor.tv/images/events/house.jpg".to_string()]);
        assert_eq!(house.titles[1], LocalizedText::with_lang("House M.D.", "en"));
        assert_eq!(house.sub_titles[1], LocalizedText::new("Kórház"));
        assert_eq!(
            house.descriptions,
            vec![LocalizedText::new("A csapat egy rejtélyes esetet vizsgál.\nMásodik sor.")]
        );
        assert_eq!(
            house.credits,
            Some(Credits {
                directors: vec!["Greg Yaitanes".to_string()],
                actors: vec![
                    "Hugh Laurie".to_string(),
                    "Lisa Edelstein".to_string(),
                    "Omar Epps".to_string(),
                ],
            })
        );
    }

    #[test]
    fn test_single_line_description() {
        let long = parser().split_long_description("Napi hírek és időjárás.");
        assert_eq!(long.description.as_deref(), Some("Napi hírek és időjárás."));
        assert_eq!(long.sub_title, None);
        assert!(long.credits.is_empty());
    }

    #[test]
    fn test_description_with_cast_only() {
        let long = parser().split_long_description("Egy bekezdés.\nFőszereplők: Kovács Anna");
        assert_eq!(long.description.as_deref(), Some("Egy bekezdés."));
        assert!(long.credits.directors.is_empty());
        assert_eq!(long.credits.actors, vec!["Kovács Anna".to_string()]);
    }

    #[rstest]
    #[case("Doktor House II./12.", "Doktor House", Some(("S02E12", "1.11.")))]
    #[case("Jóban Rosszban 4512. rész", "Jóban Rosszban", Some(("S--E4512", ".4511.")))]
    #[case("Barátok közt XIV./3. rész", "Barátok közt", Some(("S14E03", "13.2.")))]
    #[case("Híradó", "Híradó", None)]
    #[case("1. rész", "1. rész", Some(("S--E01", ".0.")))]
    fn test_split_episode_info(
        #[case] raw: &str,
        #[case] title: &str,
        #[case] expected: Option<(&str, &str)>,
    ) {
        let (short, nums) = parser().split_episode_info(raw);
        assert_eq!(short, title);

        let expected: Vec<EpisodeNum> = expected
            .map(|(onscreen, ns)| {
                vec![
                    EpisodeNum::new("onscreen", onscreen),
                    EpisodeNum::new("xmltv_ns", ns),
                ]
            })
            .unwrap_or_default();
        assert_eq!(nums, expected);
    }

    #[rstest]
    #[case("I", Some(1))]
    #[case("IV", Some(4))]
    #[case("XIV", Some(14))]
    #[case("MCMXCIV", Some(1994))]
    #[case("IIII", None)]
    #[case("VX", None)]
    fn test_from_roman(#[case] numeral: &str, #[case] expected: Option<u32>) {
        assert_eq!(from_roman(numeral), expected);
    }

    #[test]
    fn test_sub_title_without_year() {
        let start = DateTime::parse_from_rfc3339("2024-03-01T06:00:00+01:00").unwrap();
        let mut program = Program::new("X", LocalizedText::new("T"), start);
        apply_sub_title_and_year(&mut program, "Magyar dokumentumfilm");

        assert_eq!(program.date, None);
        assert_eq!(program.sub_titles, vec![LocalizedText::new("Magyar dokumentumfilm")]);
    }
}
