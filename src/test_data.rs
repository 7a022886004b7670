#[cfg(test)]
pub const POST_DATA_MD: &str = "---
title: What I learned after 20+ years of software development
date: 2024-02-12
excerpt: A short list of habits that made me a better engineer.
coverImage: /images/blog/learned.png
category: Career
author: Jordan Example
featured: true
tags:
  - career
  - engineering
---
How to be a great software engineer?

Someone asked me this question today and I didn't have an answer. After thinking for a while, I came up with a list of what I try to do myself.

## Non technical

| Habit | Why |
|-------|-----|
| Be honest | You learn faster |

~~There is a silver bullet~~ There is no silver bullet.

- [x] Write it down
- [ ] Share it

<span class=\"note\">Authors are trusted.</span>
";

#[cfg(test)]
pub const PAGE_DATA_MD: &str = "---
title: About me
---
I build developer tools.
";
